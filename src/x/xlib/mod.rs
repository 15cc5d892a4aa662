//! Implementation of `HintsConn` backed by Xlib.
//!
//! This module talks to the X server through Xlib's ICCCM helpers,
//! `XGetWMNormalHints` and `XSetWMNormalHints`. Records read or written
//! through it are [`XlibHints`], which live in memory allocated by
//! `XAllocSizeHints` and are handed back to Xlib with `XFree`, so a
//! record captured from a window can be passed straight back to Xlib
//! later on.
//!
//! Unlike the other backends, `XlibConn` can wrap a `Display` owned by
//! someone else, such as a compositor that already has a connection
//! open. See [`XlibConn::from_raw`].

use std::alloc::{handle_alloc_error, Layout};
use std::cell::Cell;
use std::ffi::CString;
use std::fmt;
use std::os::raw::{c_int, c_long, c_uchar, c_ulong};
use std::ptr::{self, NonNull};

use tracing::debug;
use x11::xlib;

use super::{
    core::{HintsConn, HintsRecord, Result, XError, XWindowID},
    property::{WireSizeHints, WmSizeHintsFlags},
};

/// A `XSizeHints` struct allocated by Xlib.
///
/// Cloning allocates a new struct through `XAllocSizeHints` and copies
/// every field bitwise, and dropping frees it with `XFree`.
///
/// `XlibHints` is neither `Send` nor `Sync`, and is meant to stay on
/// the thread that talks to the display.
pub struct XlibHints {
    ptr: NonNull<xlib::XSizeHints>,
}

impl XlibHints {
    fn alloc() -> Self {
        // SAFETY: XAllocSizeHints has no preconditions, and returns
        // either null or a zero-filled XSizeHints.
        let raw = unsafe { xlib::XAllocSizeHints() };

        match NonNull::new(raw) {
            Some(ptr) => Self { ptr },
            None => handle_alloc_error(Layout::new::<xlib::XSizeHints>()),
        }
    }

    /// Exposes the underlying pointer, for passing to Xlib.
    ///
    /// The pointer stays valid for as long as `self` does.
    pub fn as_ptr(&self) -> *mut xlib::XSizeHints {
        self.ptr.as_ptr()
    }

    fn get(&self) -> &xlib::XSizeHints {
        // SAFETY: ptr came from XAllocSizeHints and is uniquely owned by self.
        unsafe { self.ptr.as_ref() }
    }

    fn get_mut(&mut self) -> &mut xlib::XSizeHints {
        // SAFETY: as above, and we hold &mut self.
        unsafe { self.ptr.as_mut() }
    }
}

impl Clone for XlibHints {
    fn clone(&self) -> Self {
        let new = Self::alloc();

        // SAFETY: both pointers are valid XSizeHints allocations,
        // and new was just allocated so they cannot overlap.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new.ptr.as_ptr(), 1) };

        new
    }
}

impl Drop for XlibHints {
    fn drop(&mut self) {
        // SAFETY: ptr came from XAllocSizeHints and is freed only here.
        unsafe { xlib::XFree(self.ptr.as_ptr().cast()) };
    }
}

impl fmt::Debug for XlibHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlibHints")
            .field("ptr", &self.ptr)
            .field("hints", &self.to_wire())
            .finish()
    }
}

impl HintsRecord for XlibHints {
    fn zeroed() -> Self {
        Self::alloc()
    }

    fn to_wire(&self) -> WireSizeHints {
        let h = self.get();

        WireSizeHints {
            flags: WmSizeHintsFlags::from_bits_truncate(h.flags as u32),
            position: (h.x, h.y),
            size: (h.width, h.height),
            min_size: (h.min_width, h.min_height),
            max_size: (h.max_width, h.max_height),
            resize_inc: (h.width_inc, h.height_inc),
            min_aspect: (h.min_aspect.x, h.min_aspect.y),
            max_aspect: (h.max_aspect.x, h.max_aspect.y),
            base_size: (h.base_width, h.base_height),
            gravity: h.win_gravity as u32,
        }
    }

    fn from_wire(wire: &WireSizeHints) -> Self {
        let mut new = Self::alloc();
        let h = new.get_mut();

        h.flags = wire.flags.bits() as c_long;
        (h.x, h.y) = wire.position;
        (h.width, h.height) = wire.size;
        (h.min_width, h.min_height) = wire.min_size;
        (h.max_width, h.max_height) = wire.max_size;
        (h.width_inc, h.height_inc) = wire.resize_inc;
        (h.min_aspect.x, h.min_aspect.y) = wire.min_aspect;
        (h.max_aspect.x, h.max_aspect.y) = wire.max_aspect;
        (h.base_width, h.base_height) = wire.base_size;
        h.win_gravity = wire.gravity as c_int;

        new
    }
}

/// A connection to an X server, backed by Xlib.
///
/// # Usage
///
/// ```no_run
/// use xsizehints::x::xlib::XlibConn;
///
/// // open our own connection using $DISPLAY
/// let conn = XlibConn::connect(None).expect("Connection error");
/// ```
pub struct XlibConn {
    display: NonNull<xlib::Display>,
    owned: bool,
    prev_handler: Option<unsafe extern "C" fn(*mut xlib::Display, *mut xlib::XErrorEvent) -> c_int>,
}

impl XlibConn {
    /// Opens a new connection to the X server.
    ///
    /// If `name` is None, the `DISPLAY` environment variable is used.
    ///
    /// This also installs an X error handler that records errors so they
    /// can be returned from the request that caused them, instead of
    /// Xlib's default handler, which exits the process. The handler is
    /// global to the process, and the previous one is put back when the
    /// connection is dropped.
    pub fn connect(name: Option<&str>) -> Result<Self> {
        let name = name
            .map(CString::new)
            .transpose()
            .map_err(|e| XError::Connection(format!("invalid display name: {}", e)))?;

        // SAFETY: the name is either null or a valid C string that
        // outlives the call.
        let raw = unsafe {
            xlib::XOpenDisplay(name.as_ref().map_or(ptr::null(), |n| n.as_ptr()))
        };

        let display = NonNull::new(raw)
            .ok_or_else(|| XError::Connection("could not open display".into()))?;

        // SAFETY: record_x_error never unwinds and does not call back into Xlib.
        let prev_handler = unsafe { xlib::XSetErrorHandler(Some(record_x_error)) };

        debug!("Opened display {:p}", raw);

        Ok(Self {
            display,
            owned: true,
            prev_handler,
        })
    }

    /// Wraps a `Display` owned by someone else.
    ///
    /// The connection is never closed by `XlibConn`, and the owner's
    /// error handler is left alone. Errors are then reported to that
    /// handler only, and requests on the borrowed display always succeed.
    ///
    /// Returns None if `display` is null.
    ///
    /// # Safety
    ///
    /// `display` must be null or a valid open display that outlives
    /// the returned `XlibConn`.
    pub unsafe fn from_raw(display: *mut xlib::Display) -> Option<Self> {
        NonNull::new(display).map(|display| Self {
            display,
            owned: false,
            prev_handler: None,
        })
    }

    /// Exposes the underlying `Display` pointer.
    pub fn as_raw(&self) -> *mut xlib::Display {
        self.display.as_ptr()
    }
}

impl HintsConn for XlibConn {
    type Record = XlibHints;

    fn get_wm_normal_hints(
        &self,
        window: XWindowID,
        hints: &mut XlibHints,
    ) -> Result<WmSizeHintsFlags> {
        trace!("Getting WM_NORMAL_HINTS for window {}", window);

        let mut supplied: c_long = 0;
        take_x_error();

        // SAFETY: display is open, hints points to a live XSizeHints.
        let status = unsafe {
            xlib::XGetWMNormalHints(
                self.as_raw(),
                window.val() as xlib::Window,
                hints.as_ptr(),
                &mut supplied,
            )
        };

        // XGetWMNormalHints waits for the reply, so any error has
        // already gone through the handler
        if let Some(e) = take_x_error() {
            return Err(e);
        }

        if status == 0 {
            trace!("window {} has no usable WM_NORMAL_HINTS", window);
            return Ok(WmSizeHintsFlags::empty());
        }

        Ok(WmSizeHintsFlags::from_bits_truncate(supplied as u32))
    }

    fn set_wm_normal_hints(&self, window: XWindowID, hints: &XlibHints) -> Result<()> {
        trace!("Setting WM_NORMAL_HINTS for window {}", window);

        take_x_error();

        // SAFETY: display is open, hints points to a live XSizeHints
        // that Xlib only reads from.
        unsafe {
            xlib::XSetWMNormalHints(self.as_raw(), window.val() as xlib::Window, hints.as_ptr());
            xlib::XSync(self.as_raw(), xlib::False);
        }

        take_x_error().map_or(Ok(()), Err)
    }
}

impl Drop for XlibConn {
    fn drop(&mut self) {
        if self.owned {
            // SAFETY: we opened this display and nobody else closes it,
            // and prev_handler is whatever was installed before connect.
            unsafe {
                xlib::XSetErrorHandler(self.prev_handler);
                xlib::XCloseDisplay(self.display.as_ptr());
            }
        }
    }
}

impl fmt::Debug for XlibConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlibConn")
            .field("display", &self.display)
            .field("owned", &self.owned)
            .finish()
    }
}

/// The fields of an `XErrorEvent` worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct XlibError {
    error_code: c_uchar,
    request_code: c_uchar,
    minor_code: c_uchar,
    resourceid: c_ulong,
}

thread_local! {
    // Xlib calls the error handler on the thread that made the request
    static LAST_ERROR: Cell<Option<XlibError>> = Cell::new(None);
}

/// Takes the error recorded since the last call, if any.
fn take_x_error() -> Option<XError> {
    LAST_ERROR.with(Cell::take).map(|e| {
        XError::ServerError(format!(
            "X error {} from request {}.{} on resource {:#x}",
            e.error_code, e.request_code, e.minor_code, e.resourceid
        ))
    })
}

unsafe extern "C" fn record_x_error(_: *mut xlib::Display, event: *mut xlib::XErrorEvent) -> c_int {
    if let Some(event) = event.as_ref() {
        debug!(
            "X error {} from request {}.{} on resource {:#x}",
            event.error_code, event.request_code, event.minor_code, event.resourceid
        );
        LAST_ERROR.with(|last| {
            last.set(Some(XlibError {
                error_code: event.error_code,
                request_code: event.request_code,
                minor_code: event.minor_code,
                resourceid: event.resourceid,
            }))
        });
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x::property::WmSizeHintsFlags as Flags;

    fn sample() -> WireSizeHints {
        WireSizeHints {
            flags: Flags::P_MIN_SIZE | Flags::P_MAX_SIZE | Flags::P_ASPECT,
            min_size: (50, 50),
            max_size: (800, 600),
            min_aspect: (4, 3),
            max_aspect: (16, 9),
            gravity: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_zeroed_record() {
        let hints = XlibHints::zeroed();
        assert_eq!(hints.to_wire(), WireSizeHints::new());
    }

    #[test]
    fn test_record_holds_every_field() {
        let hints = XlibHints::from_wire(&sample());
        assert_eq!(hints.to_wire(), sample());
    }

    #[test]
    fn test_clone_is_a_separate_allocation() {
        let original = XlibHints::from_wire(&sample());
        let copy = original.clone();

        assert_ne!(original.as_ptr(), copy.as_ptr());
        assert_eq!(copy.to_wire(), sample());
    }

    fn error_event(code: u8, resource: c_ulong) -> xlib::XErrorEvent {
        xlib::XErrorEvent {
            type_: 0,
            display: ptr::null_mut(),
            resourceid: resource,
            serial: 0,
            error_code: code,
            request_code: 18,
            minor_code: 0,
        }
    }

    #[test]
    fn test_recorded_error_is_taken_once() {
        take_x_error();
        let mut event = error_event(3, 0x1e00007);

        let ret = unsafe { record_x_error(ptr::null_mut(), &mut event) };
        assert_eq!(ret, 0);

        let err = take_x_error().expect("error was not recorded");
        assert!(matches!(err, XError::ServerError(ref msg) if msg.contains("0x1e00007")));
        assert!(take_x_error().is_none());
    }

    #[test]
    fn test_latest_error_wins() {
        take_x_error();
        let mut first = error_event(3, 1);
        let mut second = error_event(9, 2);

        unsafe {
            record_x_error(ptr::null_mut(), &mut first);
            record_x_error(ptr::null_mut(), &mut second);
        }

        let err = take_x_error().unwrap().to_string();
        assert!(err.contains("X error 9 from request 18.0 on resource 0x2"));
    }

    #[test]
    fn test_clone_survives_original() {
        let mut original = XlibHints::from_wire(&sample());
        let copy = original.clone();

        original.get_mut().min_width = 1;
        assert_eq!(copy.to_wire().min_size, (50, 50));

        drop(original);
        assert_eq!(copy.to_wire(), sample());
    }
}
