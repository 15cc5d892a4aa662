extern crate tracing;

macro_rules! trace {
    ($fmt:expr) => {
        #[cfg(debug_assertions)]
        tracing::trace!($fmt)
    };
    ($fmt:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        tracing::trace!($fmt, $($arg)*)
    }
}

use crate::x::{XError, XWindowID};
use crate::ErrorHandler;
use tracing::warn;

/// The error handler used by [`ConstraintsService`][1] unless
/// another one is given.
///
/// It logs the error and otherwise drops it.
///
/// [1]: crate::ConstraintsService
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn call(&self, window: XWindowID, err: XError) {
        warn!("window {}: {}", window, err)
    }
}
