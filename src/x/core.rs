//! Core types and traits for interfacing with the X server.
//!
//! This module defines the ID and error types used throughout this
//! crate, as well as the two traits every backend implements:
//! [`HintsConn`] for talking to the server, and [`HintsRecord`]
//! for the memory that a size hints struct lives in.

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::ops::Deref;
use std::str::FromStr;

use thiserror::Error;

use super::property::{WireSizeHints, WmSizeHintsFlags};

/// General constant for expressing None when passing X IDs.
pub const XID_NONE: Xid = Xid::zero();

/// Wrapper type to represent IDs used by the X server.
///
/// You can create an Xid from a `u32`:
///
/// ```rust
/// use xsizehints::x::Xid;
///
/// let id = Xid::from(69);
/// let val = id.val();
///
/// assert_eq!(val, 69);
/// ```
///
/// or parse one from a decimal or `0x`-prefixed hex string,
/// as printed by tools like `xwininfo`:
///
/// ```rust
/// use xsizehints::x::Xid;
///
/// let id: Xid = "0x1e00007".parse().unwrap();
/// assert_eq!(id.val(), 0x1e00007);
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash, Default)]
pub struct Xid(pub(crate) u32);

impl Xid {
    /// Return an Xid set to 0.
    pub const fn zero() -> Self {
        Xid(0)
    }

    /// Returns the internal value of the Xid.
    pub const fn val(&self) -> u32 {
        self.0
    }

    /// Whether this is the null ID.
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Xid {
    fn from(f: u32) -> Xid {
        Xid(f)
    }
}

impl FromStr for Xid {
    type Err = ParseIntError;

    fn from_str(s: &str) -> ::std::result::Result<Xid, ParseIntError> {
        let s = s.trim();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).map(Xid),
            None => s.parse().map(Xid),
        }
    }
}

impl Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Xid({:#x})", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &u32 {
        &self.0
    }
}

/// An X server ID for a given window.
pub type XWindowID = Xid;

/// Possible errors returned by the X connection.
#[non_exhaustive]
#[derive(Debug, Error, Clone)]
pub enum XError {
    /// An error when establishing or using a connection with the server.
    #[error("X connection error: {0}")]
    Connection(String),

    /// An error caused by a malformed protocol request.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// An internal server error.
    #[error("X server error: {0}")]
    ServerError(String),

    /// A request for window properties returned malformed data.
    #[error("Invalid property data: {0}")]
    InvalidPropertyData(String),

    /// An error converting property data.
    #[error("Error converting property data")]
    ConversionError,

    /// Some error not tracked by xsizehints.
    #[error("{0}")]
    OtherError(String),
}

/// Result type for HintsConn.
pub type Result<T> = ::std::result::Result<T, XError>;

/// Storage for a single `WM_SIZE_HINTS` struct.
///
/// Each backend decides where its records live. The Xlib backend
/// keeps them in memory handed out by `XAllocSizeHints`, which must be
/// returned through `XFree`; the pure-protocol backends just use
/// [`WireSizeHints`] by value.
///
/// Implementors must make `Clone` produce a fully independent record
/// with its own backing allocation, drawn from the same allocator as
/// the original, and must release that allocation in `Drop`.
pub trait HintsRecord: Clone + fmt::Debug {
    /// Allocates a record with every field zeroed.
    fn zeroed() -> Self;

    /// Copies the record out in protocol layout.
    fn to_wire(&self) -> WireSizeHints;

    /// Allocates a new record holding the given fields.
    fn from_wire(wire: &WireSizeHints) -> Self;
}

impl HintsRecord for WireSizeHints {
    fn zeroed() -> Self {
        WireSizeHints::new()
    }

    fn to_wire(&self) -> WireSizeHints {
        *self
    }

    fn from_wire(wire: &WireSizeHints) -> Self {
        *wire
    }
}

/// A connection that can read and write `WM_NORMAL_HINTS`.
///
/// Methods map directly onto a single protocol request each, and
/// block until the server has answered. Implementors should not
/// cache anything between calls.
///
/// # Implementors
///
/// This crate provides [`XlibConn`][1], [`X11RBConn`][2] and
/// [`XCBConn`][3].
///
/// [1]: crate::x::xlib::XlibConn
/// [2]: crate::x::x11rb::X11RBConn
/// [3]: crate::x::xcb::XCBConn
pub trait HintsConn {
    /// The record type that this connection reads into and writes from.
    type Record: HintsRecord;

    /// Whether the underlying transport is still usable.
    ///
    /// Backends that cannot tell return `true` and let the
    /// request itself fail.
    fn is_live(&self) -> bool {
        true
    }

    /// Reads the `WM_NORMAL_HINTS` property of `window` into `hints`.
    ///
    /// Returns the mask of fields that the stored property was able
    /// to express. If the property is unset or malformed, `hints` is left
    /// untouched and the returned mask is empty.
    fn get_wm_normal_hints(
        &self,
        window: XWindowID,
        hints: &mut Self::Record,
    ) -> Result<WmSizeHintsFlags>;

    /// Replaces the `WM_NORMAL_HINTS` property of `window` with `hints`.
    fn set_wm_normal_hints(&self, window: XWindowID, hints: &Self::Record) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xid_from_str() {
        assert_eq!("0x1e00007".parse::<Xid>().unwrap(), Xid(0x1e00007));
        assert_eq!("0X1E00007".parse::<Xid>().unwrap(), Xid(0x1e00007));
        assert_eq!(" 31457287 ".parse::<Xid>().unwrap(), Xid(0x1e00007));
        assert!("0x".parse::<Xid>().is_err());
        assert!("window".parse::<Xid>().is_err());
    }
}
