#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::x::{
    core::{HintsConn, Result, XError, XWindowID},
    property::{WireSizeHints, WmSizeHintsFlags},
};

/// A dummy connection implementing HintsConn but actually
/// does not interface with the X server at all, and
/// should mainly be used for testing.
///
/// `DummyConn` keeps the raw bytes of each window's
/// `WM_NORMAL_HINTS` property, and counts every read and write
/// that makes it through to the "server".
#[derive(Debug, Default)]
pub struct DummyConn {
    windows: RefCell<HashMap<XWindowID, Option<Vec<u8>>>>,
    dead: Cell<bool>,
    reads: Cell<usize>,
    writes: Cell<usize>,
}

impl DummyConn {
    /// Creates a new DummyConn with no windows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a window without a `WM_NORMAL_HINTS` property.
    pub fn add_window(&self, window: XWindowID) {
        self.windows.borrow_mut().insert(window, None);
    }

    /// Adds a window with the given hints.
    pub fn add_window_with(&self, window: XWindowID, hints: &WireSizeHints) {
        self.set_raw(window, hints.to_ne_bytes());
    }

    /// Sets the property to the given words, as a client would.
    pub fn set_words(&self, window: XWindowID, words: &[u32]) {
        let bytes = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        self.set_raw(window, bytes);
    }

    /// Sets the property to the given bytes, creating the window if needed.
    pub fn set_raw(&self, window: XWindowID, bytes: Vec<u8>) {
        self.windows.borrow_mut().insert(window, Some(bytes));
    }

    /// The raw property bytes currently stored for `window`.
    pub fn raw(&self, window: XWindowID) -> Option<Vec<u8>> {
        self.windows.borrow().get(&window).cloned().flatten()
    }

    /// The hints currently stored for `window`, decoded.
    pub fn hints(&self, window: XWindowID) -> Option<WireSizeHints> {
        self.raw(window)
            .and_then(|b| WireSizeHints::decode_ne_bytes(&b).ok())
            .map(|(hints, _)| hints)
    }

    /// Removes a window, so that any further requests on it fail.
    pub fn destroy_window(&self, window: XWindowID) {
        self.windows.borrow_mut().remove(&window);
    }

    /// Simulates the transport going away.
    pub fn sever(&self) {
        self.dead.set(true)
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Total number of requests that reached the server.
    pub fn round_trips(&self) -> usize {
        self.reads() + self.writes()
    }

    // a severed connection never reaches the server, a bad window does
    fn request(&self, window: XWindowID, counter: &Cell<usize>) -> Result<()> {
        if self.dead.get() {
            return Err(XError::Connection("connection severed".into()));
        }
        counter.set(counter.get() + 1);
        if !self.windows.borrow().contains_key(&window) {
            return Err(XError::Protocol(format!("BadWindow {}", window)));
        }
        Ok(())
    }
}

impl HintsConn for DummyConn {
    type Record = WireSizeHints;

    fn is_live(&self) -> bool {
        !self.dead.get()
    }

    fn get_wm_normal_hints(
        &self,
        window: XWindowID,
        hints: &mut WireSizeHints,
    ) -> Result<WmSizeHintsFlags> {
        self.request(window, &self.reads)?;

        let Some(bytes) = self.raw(window) else {
            return Ok(WmSizeHintsFlags::empty());
        };

        match WireSizeHints::decode_ne_bytes(&bytes) {
            Ok((wire, supplied)) => {
                *hints = wire;
                Ok(supplied)
            }
            Err(_) => Ok(WmSizeHintsFlags::empty()),
        }
    }

    fn set_wm_normal_hints(&self, window: XWindowID, hints: &WireSizeHints) -> Result<()> {
        self.request(window, &self.writes)?;

        self.set_raw(window, hints.to_ne_bytes());
        Ok(())
    }
}
