use std::fmt;

use x11rb::connection::Connection;
use x11rb::errors;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt as XConnectionExt, PropMode};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperConnectionExt;

use tracing::debug;

use super::{
    core::{HintsConn, Result, XError, XWindowID},
    property::{WireSizeHints, WmSizeHintsFlags, WM_SIZE_HINTS_LEN},
};

/// A connection to an X server, backed by the x11rb library.
///
/// This is a very simple connection to the X server
/// and is completely synchronous, despite the async capabilities
/// of the underlying library.
///
/// By default it owns a pure-Rust [`RustConnection`], but it can wrap
/// any x11rb [`Connection`] the host already has.
///
/// # Usage
///
/// ```no_run
/// use xsizehints::x::x11rb::X11RBConn;
///
/// let conn = X11RBConn::connect(None).expect("Connection error");
/// ```
pub struct X11RBConn<C = RustConnection> {
    conn: C,
    idx: usize,
}

impl X11RBConn<RustConnection> {
    /// Connect to the X server and allocate a new Connection.
    ///
    /// If `display` is None, the `DISPLAY` environment variable is used.
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, idx) = x11rb::connect(display)?;
        debug!("Connected to x server, got preferred screen {}", idx);

        Ok(Self { conn, idx })
    }
}

impl<C: Connection> X11RBConn<C> {
    /// Wraps an existing connection.
    pub fn from_conn(conn: C, idx: usize) -> Self {
        Self { conn, idx }
    }

    /// Exposes `X11RBConn`'s internal connection.
    pub fn conn(&self) -> &C {
        &self.conn
    }

    /// The preferred screen reported when connecting.
    pub fn screen_idx(&self) -> usize {
        self.idx
    }
}

impl<C: Connection> HintsConn for X11RBConn<C> {
    type Record = WireSizeHints;

    fn get_wm_normal_hints(
        &self,
        window: XWindowID,
        hints: &mut WireSizeHints,
    ) -> Result<WmSizeHintsFlags> {
        trace!("Getting WM_NORMAL_HINTS for window {}", window);

        let r = self
            .conn
            .get_property(
                false,
                *window,
                AtomEnum::WM_NORMAL_HINTS,
                AtomEnum::WM_SIZE_HINTS,
                // start at offset 0
                0,
                WM_SIZE_HINTS_LEN as u32,
            )?
            .reply()?;

        if r.type_ != u32::from(AtomEnum::WM_SIZE_HINTS) {
            trace!("prop type is {}, not WM_SIZE_HINTS", r.type_);
            return Ok(WmSizeHintsFlags::empty());
        }

        let Some(words) = r.value32() else {
            trace!("received format {}", r.format);
            return Ok(WmSizeHintsFlags::empty());
        };

        match WireSizeHints::decode(&words.collect::<Vec<u32>>()) {
            Ok((wire, supplied)) => {
                *hints = wire;
                Ok(supplied)
            }
            Err(e) => {
                debug!("window {}: {}", window, e);
                Ok(WmSizeHintsFlags::empty())
            }
        }
    }

    fn set_wm_normal_hints(&self, window: XWindowID, hints: &WireSizeHints) -> Result<()> {
        trace!("Setting WM_NORMAL_HINTS for window {}", window);

        self.conn
            .change_property32(
                PropMode::REPLACE,
                *window,
                AtomEnum::WM_NORMAL_HINTS,
                AtomEnum::WM_SIZE_HINTS,
                &hints.to_words(),
            )?
            .check()?;

        Ok(())
    }
}

impl<C> fmt::Debug for X11RBConn<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X11RBConn").field("idx", &self.idx).finish()
    }
}

impl From<errors::ConnectionError> for XError {
    fn from(e: errors::ConnectionError) -> XError {
        use errors::ConnectionError::*;
        match e {
            UnknownError | InsufficientMemory | FdPassingFailed => {
                XError::Connection(e.to_string())
            }
            IoError(e) => XError::Connection(e.to_string()),
            other => XError::Protocol(other.to_string()),
        }
    }
}

impl From<errors::ConnectError> for XError {
    fn from(e: errors::ConnectError) -> XError {
        XError::Connection(e.to_string())
    }
}

impl From<errors::ReplyError> for XError {
    fn from(e: errors::ReplyError) -> XError {
        match e {
            errors::ReplyError::ConnectionError(e) => e.into(),
            errors::ReplyError::X11Error(e) => XError::ServerError(format!("{:?}", e.error_kind)),
        }
    }
}
