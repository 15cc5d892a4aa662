//! Types for configuring which X connection to use.
//!
//! `xsizehints` has no configuration file. A host either builds a
//! connection itself and hands it to a [`DirectResolver`][1] or its
//! own [`WindowResolver`][2], or describes the connection it wants
//! with a [`Config`] and lets the crate open it.
//!
//! [1]: crate::DirectResolver
//! [2]: crate::WindowResolver

use std::env;

use strum::*;
use strum_macros::EnumIter;
use thiserror::Error;
use tracing::debug;

use crate::x::{HintsConn, Result};

/// The environment variable naming the backend to use.
pub const BACKEND_VAR: &str = "XSIZEHINTS_BACKEND";

/// The environment variable naming the display to connect to.
///
/// If unset, the backends fall back to `DISPLAY`.
pub const DISPLAY_VAR: &str = "XSIZEHINTS_DISPLAY";

/// The library used to talk to the X server.
#[derive(AsRefStr, Display, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Backend {
    /// Xlib, through the `x11` crate.
    #[strum(serialize = "xlib")]
    Xlib,
    /// The pure-Rust `x11rb` crate.
    #[strum(serialize = "x11rb")]
    X11RB,
    /// libxcb, through the `xcb` crate.
    #[strum(serialize = "xcb")]
    XCB,
}

impl Backend {
    /// Whether support for this backend was compiled in.
    pub fn is_enabled(self) -> bool {
        match self {
            Backend::Xlib => cfg!(feature = "xlib"),
            Backend::X11RB => true,
            Backend::XCB => cfg!(feature = "xcb"),
        }
    }

    /// Every backend that was compiled in.
    pub fn enabled() -> impl Iterator<Item = Backend> {
        Backend::iter().filter(|b| b.is_enabled())
    }
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Xlib
    }
}

/// Errors that can occur while building a [`Config`].
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The named backend does not exist.
    #[error("unknown backend '{0}', expected one of xlib, x11rb, xcb")]
    UnknownBackend(String),

    /// An environment variable was not valid unicode.
    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),
}

/// Describes how to connect to the X server.
///
/// # Example
///
/// ```rust
/// use xsizehints::{Backend, Config};
///
/// let config = Config::new()
///     .with_backend(Backend::X11RB)
///     .with_display(":1");
///
/// assert_eq!(config.backend(), Backend::X11RB);
/// assert_eq!(config.display(), Some(":1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    display: Option<String>,
    backend: Backend,
}

impl Config {
    /// Returns the default configuration: Xlib, on `$DISPLAY`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the configuration from the environment.
    ///
    /// See [`BACKEND_VAR`] and [`DISPLAY_VAR`].
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|key| match env::var(key) {
            Ok(val) => Ok(Some(val)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
        })
    }

    fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> std::result::Result<Option<String>, ConfigError>,
    {
        let mut config = Self::new();

        if let Some(name) = lookup(BACKEND_VAR)? {
            config.backend = name
                .trim()
                .parse()
                .map_err(|_| ConfigError::UnknownBackend(name.clone()))?;
        }
        config.display = lookup(DISPLAY_VAR)?.filter(|d| !d.is_empty());

        Ok(config)
    }

    /// Sets the display to connect to.
    pub fn with_display<S: Into<String>>(mut self, display: S) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Sets the backend to connect with.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// The display to connect to, if not `$DISPLAY`.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// The backend to connect with.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Opens a connection with the configured backend and hands it
    /// to `visitor`.
    ///
    /// Returns XError::Connection if the backend was not compiled in.
    pub fn connect<V: ConnVisitor>(&self, visitor: V) -> Result<V::Output> {
        debug!("Connecting with {} to {:?}", self.backend, self.display);

        let display = self.display();
        match self.backend {
            Backend::Xlib => connect_xlib(display, visitor),
            Backend::X11RB => {
                let conn = crate::x::x11rb::X11RBConn::connect(display)?;
                Ok(visitor.visit(conn))
            }
            Backend::XCB => connect_xcb(display, visitor),
        }
    }
}

/// Something that can run against any kind of connection.
///
/// Since each backend is a different type, the code that uses a
/// connection opened by [`Config::connect`] is written once, generically,
/// and monomorphized for every backend.
///
/// # Example
///
/// ```no_run
/// use xsizehints::{Config, ConnVisitor, ConstraintsService, DirectResolver, Xid};
/// use xsizehints::x::HintsConn;
///
/// struct MinSize(Xid);
///
/// impl ConnVisitor for MinSize {
///     type Output = Option<(i32, i32)>;
///
///     fn visit<C: HintsConn>(self, conn: C) -> Self::Output {
///         let service = ConstraintsService::new(DirectResolver::new(conn));
///         service.capture(&self.0)?.min_size()
///     }
/// }
///
/// let min = Config::new().connect(MinSize(Xid::from(0x1e00007)));
/// ```
pub trait ConnVisitor {
    /// The value produced by the visit.
    type Output;

    /// Runs against `conn`.
    fn visit<C: HintsConn>(self, conn: C) -> Self::Output;
}

#[cfg(not(all(feature = "xlib", feature = "xcb")))]
fn not_built(backend: Backend) -> crate::x::XError {
    crate::x::XError::Connection(format!(
        "the {} backend was not compiled in, enable the \"{}\" feature",
        backend, backend
    ))
}

#[cfg(feature = "xlib")]
fn connect_xlib<V: ConnVisitor>(display: Option<&str>, visitor: V) -> Result<V::Output> {
    let conn = crate::x::xlib::XlibConn::connect(display)?;
    Ok(visitor.visit(conn))
}

#[cfg(not(feature = "xlib"))]
fn connect_xlib<V: ConnVisitor>(_: Option<&str>, _: V) -> Result<V::Output> {
    Err(not_built(Backend::Xlib))
}

#[cfg(feature = "xcb")]
fn connect_xcb<V: ConnVisitor>(display: Option<&str>, visitor: V) -> Result<V::Output> {
    let conn = crate::x::xcb::XCBConn::connect(display)?;
    Ok(visitor.visit(conn))
}

#[cfg(not(feature = "xcb"))]
fn connect_xcb<V: ConnVisitor>(_: Option<&str>, _: V) -> Result<V::Output> {
    Err(not_built(Backend::XCB))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(
        vars: &[(&'static str, &str)],
    ) -> impl Fn(&'static str) -> std::result::Result<Option<String>, ConfigError> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |key| Ok(vars.get(key).cloned())
    }

    #[test]
    fn test_backend_names() {
        assert_eq!("xlib".parse::<Backend>().unwrap(), Backend::Xlib);
        assert_eq!("x11rb".parse::<Backend>().unwrap(), Backend::X11RB);
        assert_eq!("xcb".parse::<Backend>().unwrap(), Backend::XCB);
        assert!("wayland".parse::<Backend>().is_err());

        for backend in Backend::iter() {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::new());
        assert_eq!(config.backend(), Backend::Xlib);
        assert_eq!(config.display(), None);
    }

    #[test]
    fn test_config_from_vars() {
        let config = Config::from_lookup(lookup(&[
            (BACKEND_VAR, " x11rb "),
            (DISPLAY_VAR, ":2"),
        ]))
        .unwrap();

        assert_eq!(config.backend(), Backend::X11RB);
        assert_eq!(config.display(), Some(":2"));
    }

    #[test]
    fn test_empty_display_is_unset() {
        let config = Config::from_lookup(lookup(&[(DISPLAY_VAR, "")])).unwrap();
        assert_eq!(config.display(), None);
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let err = Config::from_lookup(lookup(&[(BACKEND_VAR, "wayland")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("wayland".into()));
    }

    #[test]
    fn test_x11rb_is_always_enabled() {
        assert!(Backend::X11RB.is_enabled());
        assert!(Backend::enabled().any(|b| b == Backend::X11RB));
    }

    #[cfg(not(feature = "xcb"))]
    #[test]
    fn test_disabled_backend_does_not_connect() {
        struct Unreachable;

        impl ConnVisitor for Unreachable {
            type Output = ();

            fn visit<C: HintsConn>(self, _: C) {
                panic!("connected with a disabled backend")
            }
        }

        let res = Config::new().with_backend(Backend::XCB).connect(Unreachable);
        assert!(matches!(res, Err(crate::x::XError::Connection(_))));
    }
}
