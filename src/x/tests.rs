//! Tests against a live X server.
//!
//! Run with `RUSTFLAGS="--cfg protocol" cargo test` on a machine with
//! `DISPLAY` set, such as under Xvfb.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, CreateWindowAux, WindowClass};
use x11rb::rust_connection::RustConnection;

use super::{x11rb::X11RBConn, HintsConn, WireSizeHints, WmSizeHintsFlags, XWindowID};
use crate::{ConstraintsService, DirectResolver};

// keeps a window alive for the duration of a test
struct TestWindow {
    conn: RustConnection,
    id: XWindowID,
}

impl TestWindow {
    fn new() -> Self {
        let (conn, idx) = x11rb::connect(None).expect("no X server to test against");
        let root = conn.setup().roots[idx].root;
        let id = conn.generate_id().unwrap();

        conn.create_window(
            0,
            id,
            root,
            0,
            0,
            100,
            100,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &CreateWindowAux::new(),
        )
        .unwrap()
        .check()
        .unwrap();

        Self {
            conn,
            id: XWindowID::from(id),
        }
    }
}

impl Drop for TestWindow {
    fn drop(&mut self) {
        if let Ok(cookie) = self.conn.destroy_window(*self.id) {
            let _ = cookie.check();
        }
    }
}

fn initial() -> WireSizeHints {
    WireSizeHints {
        flags: WmSizeHintsFlags::P_MIN_SIZE
            | WmSizeHintsFlags::P_MAX_SIZE
            | WmSizeHintsFlags::P_BASE_SIZE,
        min_size: (50, 50),
        max_size: (800, 600),
        base_size: (10, 10),
        ..Default::default()
    }
}

fn test_save_override_restore_generic<C: HintsConn>(conn: C) {
    let window = TestWindow::new();
    let observer = X11RBConn::from_conn(RustConnection::connect(None).unwrap().0, 0);
    observer
        .set_wm_normal_hints(window.id, &initial())
        .expect("could not set initial hints");

    let service = ConstraintsService::new(DirectResolver::new(conn));

    let saved = service.capture(&window.id).expect("window did not resolve");
    assert_eq!(saved.wire(), initial());

    service.override_constraints(&window.id, 0, 0, 0, 0);

    let mut read = WireSizeHints::new();
    observer.get_wm_normal_hints(window.id, &mut read).unwrap();
    assert_eq!(read, WireSizeHints::with_min_max((0, 0), (0, 0)));

    service.apply(&window.id, Some(&saved));

    let mut read = WireSizeHints::new();
    observer.get_wm_normal_hints(window.id, &mut read).unwrap();
    assert_eq!(read, initial());
}

#[test]
fn test_save_override_restore_x11rb() {
    test_save_override_restore_generic(X11RBConn::connect(None).unwrap());
}

#[cfg(feature = "xlib")]
#[test]
fn test_save_override_restore_xlib() {
    test_save_override_restore_generic(super::xlib::XlibConn::connect(None).unwrap());
}

#[cfg(feature = "xcb")]
#[test]
fn test_save_override_restore_xcb() {
    test_save_override_restore_generic(super::xcb::XCBConn::connect(None).unwrap());
}

#[test]
fn test_window_without_hints() {
    let window = TestWindow::new();
    let conn = X11RBConn::connect(None).unwrap();

    let mut read = WireSizeHints::new();
    let supplied = conn.get_wm_normal_hints(window.id, &mut read).unwrap();

    assert!(supplied.is_empty());
    assert_eq!(read, WireSizeHints::new());
}

#[cfg(feature = "xlib")]
#[test]
fn test_xlib_errors_reach_handler() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::XError;

    let window = TestWindow::new();
    let id = window.id;
    drop(window);

    let conn = super::xlib::XlibConn::connect(None).unwrap();
    let mut hints = <super::xlib::XlibHints as super::HintsRecord>::zeroed();
    assert!(conn.get_wm_normal_hints(id, &mut hints).is_err());
    assert!(conn.set_wm_normal_hints(id, &hints).is_err());

    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let service = ConstraintsService::with_error_handler(
        DirectResolver::new(conn),
        move |window: XWindowID, err: XError| sink.borrow_mut().push((window, err.to_string())),
    );

    let saved = service.capture(&id);
    service.apply(&id, saved.as_ref());
    service.override_constraints(&id, 0, 0, 0, 0);

    assert_eq!(errors.borrow().len(), 3);
}
