//! Types for working with the `WM_SIZE_HINTS` property.

use std::convert::TryFrom;
use std::fmt;

use byteorder::{ByteOrder, NativeEndian};

use crate::x::core::{Result, XError};

bitflags! {
    /// The flags used inside WmSizeHints.
    #[derive(Default)]
    pub struct WmSizeHintsFlags: u32 {
        /// User-specified x and y
        const US_POSITION   = 0b0000000001;
        /// User-specified window size
        const US_SIZE       = 0b0000000010;
        /// Program-specified position
        const P_POSITION    = 0b0000000100;
        /// Program-specified size
        const P_SIZE        = 0b0000001000;
        /// Program-specified minimum size
        const P_MIN_SIZE    = 0b0000010000;
        /// Program specified maximum size
        const P_MAX_SIZE    = 0b0000100000;
        /// Program specified resize increments
        const P_RESIZE_INC  = 0b0001000000;
        /// Program specified aspect ratios
        const P_ASPECT      = 0b0010000000;
        /// Program specified base size
        const P_BASE_SIZE   = 0b0100000000;
        /// Program specified window gravity
        const P_WIN_GRAVITY = 0b1000000000;

        /// Every program-specified hint in the pre-ICCCM layout.
        const P_ALL_HINTS = Self::P_POSITION.bits
            | Self::P_SIZE.bits
            | Self::P_MIN_SIZE.bits
            | Self::P_MAX_SIZE.bits
            | Self::P_RESIZE_INC.bits
            | Self::P_ASPECT.bits;
    }
}

/// The length of the data for WM_SIZE_HINTS.
pub const WM_SIZE_HINTS_LEN: usize = 18;

/// The length of WM_SIZE_HINTS as written by pre-ICCCM clients,
/// which lacks base size and gravity.
pub const OLD_WM_SIZE_HINTS_LEN: usize = 15;

/// ICCCM-defined window size hints (WM_SIZE_HINTS), in the
/// layout that goes over the wire.
///
/// Unlike a parsed view, every field is kept regardless of whether
/// its flag is set, so that a property read from a window can be
/// written back exactly as it was found.
///
/// ## Notes
///
/// Position and Size are outdated and only exist for
/// backwards compatibility.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct WireSizeHints {
    /// Which of the fields below are meaningful.
    pub flags: WmSizeHintsFlags,
    /// Obsolete position.
    pub position: (i32, i32),
    /// Obsolete size.
    pub size: (i32, i32),
    /// Minimum width and height.
    pub min_size: (i32, i32),
    /// Maximum width and height.
    pub max_size: (i32, i32),
    /// Width and height resize increments.
    pub resize_inc: (i32, i32),
    /// Minimum aspect ratio as (numerator, denominator).
    pub min_aspect: (i32, i32),
    /// Maximum aspect ratio as (numerator, denominator).
    pub max_aspect: (i32, i32),
    /// Base width and height.
    pub base_size: (i32, i32),
    /// Window gravity.
    pub gravity: u32,
}

impl WireSizeHints {
    /// Returns an empty `WireSizeHints`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates hints that only declare a minimum and maximum size.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xsizehints::x::property::{WireSizeHints, WmSizeHintsFlags};
    ///
    /// let hints = WireSizeHints::with_min_max((20, 20), (50, 50));
    ///
    /// assert_eq!(
    ///     hints.flags,
    ///     WmSizeHintsFlags::P_MIN_SIZE | WmSizeHintsFlags::P_MAX_SIZE
    /// );
    /// assert!(!hints.is_set(WmSizeHintsFlags::P_ASPECT));
    /// ```
    pub fn with_min_max(min_size: (i32, i32), max_size: (i32, i32)) -> Self {
        Self {
            flags: WmSizeHintsFlags::P_MIN_SIZE | WmSizeHintsFlags::P_MAX_SIZE,
            min_size,
            max_size,
            ..Default::default()
        }
    }

    /// Test whether `flag` is set.
    pub fn is_set(&self, flag: WmSizeHintsFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Decodes a WM_SIZE_HINTS property value
    /// according to the following C struct definition:
    ///
    /// ```c
    /// typedef struct {
    ///     uint32_t flags;
    ///     int32_t x, y;
    ///     int32_t width, height;
    ///     int32_t min_width, min_height;
    ///     int32_t max_width, max_height;
    ///     int32_t width_inc, height_inc;
    ///     int32_t min_aspect_num, min_aspect_den;
    ///     int32_t max_aspect_num, max_aspect_den;
    ///     int32_t base_width, base_height;
    ///     uint32_t win_gravity;
    /// } xcb_size_hints_t;
    /// ```
    ///
    /// Declaration taken from
    /// [here](https://cgit.freedesktop.org/xcb/util-wm/tree/icccm/xcb_icccm.h).
    ///
    /// Old clients write only the first 15 words. Along with the hints,
    /// this returns the mask of fields the data was able to express,
    /// and flags outside that mask are cleared, the same way Xlib's
    /// `XGetWMSizeHints` does it.
    ///
    /// Returns XError::InvalidPropertyData if fewer than 15 words are given.
    pub fn decode(raw: &[u32]) -> Result<(Self, WmSizeHintsFlags)> {
        use WmSizeHintsFlags as WMSHFlags;

        if raw.len() < OLD_WM_SIZE_HINTS_LEN {
            return Err(XError::InvalidPropertyData(format!(
                "expected at least [u32; 15], got {}",
                raw.len()
            )));
        }

        let mut supplied = WMSHFlags::US_POSITION | WMSHFlags::US_SIZE | WMSHFlags::P_ALL_HINTS;

        let pair = |i: usize| (raw[i] as i32, raw[i + 1] as i32);

        let mut hints = WireSizeHints {
            flags: WMSHFlags::empty(),
            position: pair(1),
            size: pair(3),
            min_size: pair(5),
            max_size: pair(7),
            resize_inc: pair(9),
            min_aspect: pair(11),
            max_aspect: pair(13),
            base_size: (0, 0),
            gravity: 0,
        };

        if raw.len() >= WM_SIZE_HINTS_LEN {
            hints.base_size = pair(15);
            hints.gravity = raw[17];
            supplied |= WMSHFlags::P_BASE_SIZE | WMSHFlags::P_WIN_GRAVITY;
        }

        hints.flags = WMSHFlags::from_bits_truncate(raw[0]) & supplied;

        Ok((hints, supplied))
    }

    /// Encodes the hints into the 18 words of a WM_SIZE_HINTS property.
    pub fn to_words(&self) -> [u32; WM_SIZE_HINTS_LEN] {
        let (x, y) = self.position;
        let (w, h) = self.size;
        let (min_w, min_h) = self.min_size;
        let (max_w, max_h) = self.max_size;
        let (inc_w, inc_h) = self.resize_inc;
        let (min_an, min_ad) = self.min_aspect;
        let (max_an, max_ad) = self.max_aspect;
        let (base_w, base_h) = self.base_size;

        [
            self.flags.bits(),
            x as u32,
            y as u32,
            w as u32,
            h as u32,
            min_w as u32,
            min_h as u32,
            max_w as u32,
            max_h as u32,
            inc_w as u32,
            inc_h as u32,
            min_an as u32,
            min_ad as u32,
            max_an as u32,
            max_ad as u32,
            base_w as u32,
            base_h as u32,
            self.gravity,
        ]
    }

    /// Encodes the hints as raw format-32 property bytes, in the
    /// byte order of the client, as Xlib and libxcb hand them out.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; WM_SIZE_HINTS_LEN * 4];
        NativeEndian::write_u32_into(&self.to_words(), &mut bytes);
        bytes
    }

    /// Decodes raw format-32 property bytes. See [`WireSizeHints::decode`].
    pub fn decode_ne_bytes(bytes: &[u8]) -> Result<(Self, WmSizeHintsFlags)> {
        if bytes.len() % 4 != 0 {
            return Err(XError::InvalidPropertyData(format!(
                "{} bytes is not a whole number of words",
                bytes.len()
            )));
        }

        let mut words = vec![0; bytes.len() / 4];
        NativeEndian::read_u32_into(bytes, &mut words);

        Self::decode(&words)
    }
}

impl TryFrom<&[u32]> for WireSizeHints {
    type Error = XError;

    fn try_from(from: &[u32]) -> Result<Self> {
        Self::decode(from).map(|(hints, _)| hints)
    }
}

impl fmt::Display for WireSizeHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WmSizeHintsFlags as WMSHFlags;

        write!(f, "flags: {:?}", self.flags)?;

        if self.is_set(WMSHFlags::P_MIN_SIZE) {
            write!(f, ", min: {}x{}", self.min_size.0, self.min_size.1)?;
        }
        if self.is_set(WMSHFlags::P_MAX_SIZE) {
            write!(f, ", max: {}x{}", self.max_size.0, self.max_size.1)?;
        }
        if self.is_set(WMSHFlags::P_BASE_SIZE) {
            write!(f, ", base: {}x{}", self.base_size.0, self.base_size.1)?;
        }
        if self.is_set(WMSHFlags::P_RESIZE_INC) {
            write!(f, ", inc: {}x{}", self.resize_inc.0, self.resize_inc.1)?;
        }
        if self.is_set(WMSHFlags::P_ASPECT) {
            write!(
                f,
                ", aspect: {}/{} - {}/{}",
                self.min_aspect.0, self.min_aspect.1, self.max_aspect.0, self.max_aspect.1
            )?;
        }
        if self.is_set(WMSHFlags::P_WIN_GRAVITY) {
            write!(f, ", gravity: {}", self.gravity)?;
        }

        Ok(())
    }
}
