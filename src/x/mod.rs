//! Types and traits providing a unified interface with the X server.
//!
//! The core of this module is the [`HintsConn`] trait, which defines
//! how this crate reads and writes the `WM_NORMAL_HINTS` property
//! of a window, and the [`HintsRecord`] trait, which abstracts over
//! where a backend keeps the hints it reads.
//!
//! For concrete implementations of the traits exported here, this module
//! offers three submodules, backed by Xlib, x11rb and XCB respectively.
//! The Xlib and XCB backends link against the native libraries, and
//! are gated behind the `xlib` and `xcb` cargo features.

pub mod core;
pub mod property;

#[cfg(feature = "xlib")]
pub mod xlib;

/// Implementation of `HintsConn` backed by the `x11rb` library.
pub mod x11rb;

#[cfg(feature = "xcb")]
pub mod xcb;

#[cfg(test)]
pub(crate) mod dummy;

#[cfg(all(test, protocol))]
mod tests;

#[doc(inline)]
pub use self::core::{HintsConn, HintsRecord, Result, XError, XWindowID, Xid, XID_NONE};
#[doc(inline)]
pub use self::property::{WireSizeHints, WmSizeHintsFlags};
