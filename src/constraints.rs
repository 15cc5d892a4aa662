//! The value type holding a captured set of size hints.

use crate::x::{HintsRecord, WireSizeHints, WmSizeHintsFlags};

/// A window's `WM_NORMAL_HINTS`, as captured from the X server.
///
/// The hints are kept in a record allocated by the backend the value
/// was captured through, so it can be written back through that same
/// backend without any conversion. Every field of the property is kept,
/// including the ones this crate never looks at.
///
/// `SizeConstraints` can only be created by
/// [`ConstraintsService::capture`][1]. It is exclusively owned:
/// cloning it makes a deep copy with its own allocation, and dropping
/// it frees that allocation.
///
/// [1]: crate::ConstraintsService::capture
#[derive(Clone, Debug)]
pub struct SizeConstraints<R: HintsRecord> {
    record: R,
    supplied: WmSizeHintsFlags,
}

impl<R: HintsRecord> SizeConstraints<R> {
    pub(crate) fn new(record: R, supplied: WmSizeHintsFlags) -> Self {
        Self { record, supplied }
    }

    /// Makes an independent copy of `self`.
    ///
    /// The copy lives in a new allocation from the same allocator as
    /// `self`, and shares nothing with it.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Frees the backing record.
    ///
    /// This is the same as dropping the value.
    pub fn release(self) {
        drop(self)
    }

    /// The set of hints present on the window when it was captured.
    pub fn flags(&self) -> WmSizeHintsFlags {
        self.wire().flags
    }

    /// The minimum size, if the window set one.
    pub fn min_size(&self) -> Option<(i32, i32)> {
        let wire = self.wire();
        wire.is_set(WmSizeHintsFlags::P_MIN_SIZE)
            .then_some(wire.min_size)
    }

    /// The maximum size, if the window set one.
    pub fn max_size(&self) -> Option<(i32, i32)> {
        let wire = self.wire();
        wire.is_set(WmSizeHintsFlags::P_MAX_SIZE)
            .then_some(wire.max_size)
    }

    /// The hints that the stored property was able to express.
    ///
    /// This is empty if the window had no usable `WM_NORMAL_HINTS`
    /// when it was captured.
    pub fn supplied(&self) -> WmSizeHintsFlags {
        self.supplied
    }

    /// Copies every field out in protocol layout.
    pub fn wire(&self) -> WireSizeHints {
        self.record.to_wire()
    }

    /// The backend record holding the hints.
    pub fn record(&self) -> &R {
        &self.record
    }
}
