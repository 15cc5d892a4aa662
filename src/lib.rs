//! # xsizehints
//!
//! Save, restore and override the ICCCM size hints of X11 windows.
//!
//! A compositor that wants to force-tile a window with a fixed size
//! has to get around the client's declared `WM_NORMAL_HINTS`, and put
//! them back once the window leaves the tiling layout. This crate
//! does exactly that, by talking to the X server directly:
//!
//! - [`ConstraintsService::capture`] reads a window's hints into a
//!   [`SizeConstraints`] that the caller keeps around.
//! - [`ConstraintsService::override_constraints`] replaces them with
//!   nothing but a minimum and a maximum size.
//! - [`ConstraintsService::apply`] writes a captured value back,
//!   byte for byte.
//!
//! Windows are turned into a connection and an X window ID by a
//! [`WindowResolver`], which the host implements for its own window type.
//!
//! ```no_run
//! use xsizehints::{ConstraintsService, DirectResolver, Xid};
//! use xsizehints::x::x11rb::X11RBConn;
//!
//! let conn = X11RBConn::connect(None).expect("Connection error");
//! let service = ConstraintsService::new(DirectResolver::new(conn));
//!
//! let window = Xid::from(0x1e00007);
//! let saved = service.capture(&window);
//!
//! service.override_constraints(&window, 0, 0, 0, 0);
//! // ...
//! service.apply(&window, saved.as_ref());
//! ```
//!
//! ## Backends
//!
//! See the [`x`] module for the available connections.

#[macro_use]
extern crate bitflags;

#[macro_use]
mod log;

pub mod config;
pub mod constraints;
pub mod resolve;
pub mod service;
pub mod x;

#[doc(inline)]
pub use crate::config::{Backend, Config, ConfigError, ConnVisitor};
#[doc(inline)]
pub use crate::constraints::SizeConstraints;
pub use crate::log::DefaultErrorHandler;
#[doc(inline)]
pub use crate::resolve::{DirectResolver, WindowResolver};
#[doc(inline)]
pub use crate::service::ConstraintsService;
pub use crate::x::core::Result as XResult;
pub use crate::x::{XError, XWindowID, Xid};

/// A type that can handle errors that occur while talking to the
/// X server on behalf of a [`ConstraintsService`].
///
/// None of the service's operations return errors, so this is the only
/// place they surface.
///
/// It is implemented for any `Fn(XWindowID, XError)`:
///
/// ```rust
/// use xsizehints::{ErrorHandler, XError, Xid};
///
/// let handler = |window: Xid, err: XError| eprintln!("{}: {}", window, err);
/// handler.call(Xid::from(1), XError::ConversionError);
/// ```
pub trait ErrorHandler {
    /// Called on every error encountered.
    fn call(&self, window: XWindowID, err: XError);
}

impl<F> ErrorHandler for F
where
    F: Fn(XWindowID, XError),
{
    fn call(&self, window: XWindowID, err: XError) {
        (self)(window, err)
    }
}
