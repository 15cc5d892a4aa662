//! The capture, apply and override operations.

use std::fmt;

use tracing::{debug, instrument};

use crate::constraints::SizeConstraints;
use crate::log::DefaultErrorHandler;
use crate::resolve::WindowResolver;
use crate::x::{HintsConn, HintsRecord, WireSizeHints};
use crate::ErrorHandler;

/// The record type that a resolver's connection reads into.
pub type RecordOf<R> = <<R as WindowResolver>::Conn as HintsConn>::Record;

/// Saves, restores and overrides the size hints of windows.
///
/// Every operation first resolves the window through `R`, and does
/// nothing if that fails. Otherwise it makes exactly one request to the
/// X server. None of them report errors to the caller: any error from
/// the server is handed to the service's [`ErrorHandler`] and the
/// operation carries on as if the request had succeeded.
pub struct ConstraintsService<R, H = DefaultErrorHandler> {
    resolver: R,
    ehandler: H,
}

impl<R: WindowResolver> ConstraintsService<R> {
    /// Creates a new service that logs errors with the
    /// [`DefaultErrorHandler`].
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            ehandler: DefaultErrorHandler,
        }
    }
}

impl<R, H> ConstraintsService<R, H>
where
    R: WindowResolver,
    H: ErrorHandler,
{
    /// Creates a new service with the given error handler.
    pub fn with_error_handler(resolver: R, ehandler: H) -> Self {
        Self { resolver, ehandler }
    }

    /// Replaces the error handler.
    pub fn set_error_handler<E: ErrorHandler>(self, ehandler: E) -> ConstraintsService<R, E> {
        ConstraintsService {
            resolver: self.resolver,
            ehandler,
        }
    }

    /// Exposes the service's resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Reads the current size hints of `window`.
    ///
    /// Returns None if the window could not be resolved. If the window
    /// has no usable `WM_NORMAL_HINTS`, or the read fails, the result
    /// holds zeroed hints instead.
    #[instrument(level = "debug", skip_all)]
    pub fn capture(&self, window: &R::Window) -> Option<SizeConstraints<RecordOf<R>>> {
        let (conn, id) = self.resolver.resolve(window)?;

        let mut record = <RecordOf<R> as HintsRecord>::zeroed();
        let supplied = match conn.get_wm_normal_hints(id, &mut record) {
            Ok(supplied) => supplied,
            Err(e) => {
                self.ehandler.call(id, e);
                Default::default()
            }
        };

        debug!("captured hints of {}, supplied {:?}", id, supplied);
        Some(SizeConstraints::new(record, supplied))
    }

    /// Writes `constraints` back to `window`, exactly as they were
    /// captured.
    ///
    /// Does nothing if `constraints` is None or the window could not
    /// be resolved.
    #[instrument(level = "debug", skip_all)]
    pub fn apply(&self, window: &R::Window, constraints: Option<&SizeConstraints<RecordOf<R>>>) {
        let Some(constraints) = constraints else {
            trace!("nothing to apply");
            return;
        };
        let Some((conn, id)) = self.resolver.resolve(window) else {
            return;
        };

        debug!("restoring hints of {}", id);
        if let Err(e) = conn.set_wm_normal_hints(id, constraints.record()) {
            self.ehandler.call(id, e);
        }
    }

    /// Replaces the size hints of `window` with just a minimum and
    /// maximum size.
    ///
    /// Every other hint the window had is dropped, not merged.
    #[instrument(level = "debug", skip(self, window))]
    pub fn override_constraints(
        &self,
        window: &R::Window,
        min_width: i32,
        min_height: i32,
        max_width: i32,
        max_height: i32,
    ) {
        let Some((conn, id)) = self.resolver.resolve(window) else {
            return;
        };

        let record = <RecordOf<R> as HintsRecord>::from_wire(&WireSizeHints::with_min_max(
            (min_width, min_height),
            (max_width, max_height),
        ));

        debug!("overriding hints of {}", id);
        if let Err(e) = conn.set_wm_normal_hints(id, &record) {
            self.ehandler.call(id, e);
        }
    }
}

impl<R: fmt::Debug, H> fmt::Debug for ConstraintsService<R, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintsService")
            .field("resolver", &self.resolver)
            .finish()
    }
}
