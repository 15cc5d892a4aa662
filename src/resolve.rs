//! Resolution of host windows into X connections and window IDs.

use crate::x::{HintsConn, XWindowID};

/// A type that maps the host's windows onto the X server.
///
/// The host implements `connection` and `xwindow` for whatever it
/// uses to represent a window. [`resolve`][WindowResolver::resolve]
/// chains them together, and is what
/// [`ConstraintsService`](crate::ConstraintsService) calls before every
/// request.
///
/// # Example
///
/// ```rust
/// use xsizehints::{WindowResolver, Xid, XWindowID};
/// # use xsizehints::x::x11rb::X11RBConn;
///
/// struct Surface {
///     xid: Option<u32>,
/// }
///
/// struct Compositor {
///     conn: Option<X11RBConn>,
/// }
///
/// impl WindowResolver for Compositor {
///     type Window = Surface;
///     type Conn = X11RBConn;
///
///     fn connection(&self, _: &Surface) -> Option<&X11RBConn> {
///         self.conn.as_ref()
///     }
///
///     fn xwindow(&self, surface: &Surface) -> Option<XWindowID> {
///         surface.xid.map(Xid::from)
///     }
/// }
/// ```
pub trait WindowResolver {
    /// The host's window handle.
    type Window: ?Sized;

    /// The connection that the handle's display is reached through.
    type Conn: HintsConn;

    /// The connection to the display that `window` lives on,
    /// if it has one.
    fn connection(&self, window: &Self::Window) -> Option<&Self::Conn>;

    /// The X ID of `window`, if it has one.
    fn xwindow(&self, window: &Self::Window) -> Option<XWindowID>;

    /// Resolves `window` into a live connection and a non-zero window ID.
    ///
    /// Returns None if any step fails.
    fn resolve(&self, window: &Self::Window) -> Option<(&Self::Conn, XWindowID)> {
        let Some(conn) = self.connection(window) else {
            trace!("window has no connection");
            return None;
        };

        if !conn.is_live() {
            trace!("connection is not live");
            return None;
        }

        match self.xwindow(window) {
            Some(id) if !id.is_none() => Some((conn, id)),
            _ => {
                trace!("window has no X id");
                None
            }
        }
    }
}

/// A resolver for hosts that already refer to windows by their X ID.
///
/// It owns a single connection, and every window is assumed to be on it.
#[derive(Debug)]
pub struct DirectResolver<C> {
    conn: C,
}

impl<C: HintsConn> DirectResolver<C> {
    /// Creates a new `DirectResolver` over `conn`.
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Exposes the underlying connection.
    pub fn conn(&self) -> &C {
        &self.conn
    }

    /// Consumes `self` and returns the connection.
    pub fn into_inner(self) -> C {
        self.conn
    }
}

impl<C: HintsConn> WindowResolver for DirectResolver<C> {
    type Window = XWindowID;
    type Conn = C;

    fn connection(&self, _: &XWindowID) -> Option<&C> {
        Some(&self.conn)
    }

    fn xwindow(&self, window: &XWindowID) -> Option<XWindowID> {
        Some(*window)
    }
}
