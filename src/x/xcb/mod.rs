//! Implementation of `HintsConn` backed by the `xcb` library.
//!
//! NOTE: As of `xcb` 1.2.1, there is a bug in the library that causes
//! panics due to a misaligned pointer dereference. You should use
//! `x11rb` or Xlib instead where possible.

use std::fmt;

use tracing::debug;

use xcb::x;
use xcb::XidNew;

use super::{
    core::{HintsConn, Result, XError, XWindowID},
    property::{WireSizeHints, WmSizeHintsFlags, WM_SIZE_HINTS_LEN},
};

mod util;

use util::{cast, req_and_check, req_and_reply};

/// A connection to an X server, backed by the XCB library.
///
/// This is a very simple connection to the X server
/// and is completely synchronous, despite the async capabilities
/// of the underlying xcb library.
///
/// # Usage
///
/// ```no_run
/// use xsizehints::x::xcb::XCBConn;
///
/// let conn = XCBConn::connect(None).expect("Connection error");
/// ```
pub struct XCBConn {
    conn: xcb::Connection,
    idx: i32,
}

impl XCBConn {
    /// Connect to the X server and allocate a new Connection.
    ///
    /// If `display` is None, the `DISPLAY` environment variable is used.
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, idx) = xcb::Connection::connect(display)?;
        debug!("Connected to x server, got preferred screen {}", idx);

        Ok(Self { conn, idx })
    }

    /// Wraps an existing connection.
    pub fn from_conn(conn: xcb::Connection, idx: i32) -> Self {
        Self { conn, idx }
    }

    /// Exposes `XCBConn`'s internal connection.
    pub fn conn(&self) -> &xcb::Connection {
        &self.conn
    }

    /// The preferred screen reported when connecting.
    pub fn screen_idx(&self) -> i32 {
        self.idx
    }
}

impl HintsConn for XCBConn {
    type Record = WireSizeHints;

    fn is_live(&self) -> bool {
        self.conn.has_error().is_ok()
    }

    fn get_wm_normal_hints(
        &self,
        window: XWindowID,
        hints: &mut WireSizeHints,
    ) -> Result<WmSizeHintsFlags> {
        trace!("Getting WM_NORMAL_HINTS for window {}", window);

        let r = req_and_reply!(
            self.conn,
            &x::GetProperty {
                delete: false,
                window: cast!(x::Window, *window),
                property: x::ATOM_WM_NORMAL_HINTS,
                r#type: x::ATOM_WM_SIZE_HINTS,
                // start at offset 0
                long_offset: 0,
                long_length: WM_SIZE_HINTS_LEN as u32,
            }
        )?;

        if r.r#type() != x::ATOM_WM_SIZE_HINTS {
            trace!("prop type is not WM_SIZE_HINTS");
            return Ok(WmSizeHintsFlags::empty());
        }

        if r.format() != 32 {
            trace!("received format {}", r.format());
            return Ok(WmSizeHintsFlags::empty());
        }

        match WireSizeHints::decode(r.value::<u32>()) {
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

        req_and_check!(
            self.conn,
            &x::ChangeProperty {
                mode: x::PropMode::Replace,
                window: cast!(x::Window, *window),
                property: x::ATOM_WM_NORMAL_HINTS,
                r#type: x::ATOM_WM_SIZE_HINTS,
                data: &hints.to_words(),
            }
        )?;

        Ok(())
    }
}

impl fmt::Debug for XCBConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XCBConn").field("idx", &self.idx).finish()
    }
}

impl From<xcb::ConnError> for XError {
    fn from(e: xcb::ConnError) -> XError {
        XError::Connection(e.to_string())
    }
}

impl From<xcb::ProtocolError> for XError {
    fn from(e: xcb::ProtocolError) -> XError {
        XError::Protocol(e.to_string())
    }
}

impl From<xcb::Error> for XError {
    fn from(e: xcb::Error) -> XError {
        match e {
            xcb::Error::Connection(e) => e.into(),
            xcb::Error::Protocol(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcb::Xid as XCBid;

    #[test]
    fn test_cast_keeps_resource_id() {
        let window = cast!(x::Window, 0x1e00007);
        assert_eq!(window.resource_id(), 0x1e00007);
    }
}
