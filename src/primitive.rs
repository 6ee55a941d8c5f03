//! Restricted integer types carried inside MIDI messages.
//!
//! Status bytes split into a 4-bit kind and a 4-bit channel, data bytes carry 7 bits, and a pair of
//! data bytes carries 14 bits. The builders clamp their arguments into these ranges, while the
//! decoder masks off whatever does not fit.

use crate::prelude::*;

macro_rules! restricted_int {
    {$(#[$attr:meta])* $name:ident : $inner:tt => $bits:expr} => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
        #[repr(transparent)]
        #[allow(non_camel_case_types)]
        pub struct $name($inner);
        impl From<$inner> for $name {
            /// Lossy conversion, masks off the top bits.
            #[inline]
            fn from(raw: $inner) -> $name {
                $name::from_int_lossy(raw)
            }
        }
        impl From<$name> for $inner {
            #[inline]
            fn from(restricted: $name) -> $inner {restricted.0}
        }
        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
        impl $name {
            const MASK: $inner = (1 << $bits) - 1;

            /// The maximum value that this restricted integer can hold.
            #[inline]
            pub const fn max_value() -> $name {
                $name(Self::MASK)
            }

            /// Creates a restricted int from its non-restricted counterpart by masking off the
            /// extra bits.
            #[inline]
            pub const fn new(raw: $inner) -> $name {
                $name(raw & Self::MASK)
            }

            /// Creates a restricted int from its non-restricted counterpart by masking off the
            /// extra bits.
            #[inline]
            pub const fn from_int_lossy(raw: $inner) -> $name {
                $name(raw & Self::MASK)
            }

            /// Creates a restricted int from its non-restricted counterpart, clamping values
            /// above the range to the maximum value.
            #[inline]
            pub const fn saturating(raw: $inner) -> $name {
                if raw > Self::MASK {
                    $name(Self::MASK)
                } else {
                    $name(raw)
                }
            }

            /// Returns `Some` if the raw integer is within range of the restricted integer, and
            /// `None` otherwise.
            #[inline]
            pub fn try_from(raw: $inner) -> Option<$name> {
                if raw <= Self::MASK {
                    Some($name(raw))
                } else {
                    None
                }
            }

            /// Get the inner integer out of the wrapper.
            /// The inner integer is guaranteed to be in range of the restricted wrapper.
            #[inline]
            pub const fn as_int(self) -> $inner {
                self.0
            }

            #[allow(dead_code)]
            #[inline]
            pub(crate) fn check_int(raw: $inner) -> StdResult<$name, &'static ErrorKind> {
                Self::try_from(raw).ok_or_else(
                    || err_malformed!("invalid integer with top bits set")
                )
            }
        }
        impl PartialEq<$inner> for $name {
            fn eq(&self, rhs: &$inner) -> bool {
                self.as_int() == *rhs
            }
        }
        impl PartialEq<$name> for $inner {
            fn eq(&self, rhs: &$name) -> bool {
                *self == rhs.as_int()
            }
        }
    };
}
restricted_int! {
    /// A 14-bit integer type, as carried by Pitch Bend and Song Position Pointer messages.
    ///
    /// Wraps the `u16` type and ensures that the top two bits are always zero.
    u14: u16 => 14
}
restricted_int! {
    /// A 7-bit integer type, the payload of a single data byte.
    ///
    /// Wraps the `u8` type and ensures that the top bit is always zero.
    u7: u8 => 7
}
restricted_int! {
    /// A 4-bit integer type, used for channel numbers.
    ///
    /// Wraps the `u8` type and ensures that the top 4 bits are always zero.
    u4: u8 => 4
}

impl u14 {
    /// Split into the `[lsb, msb]` pair of 7-bit data bytes, in wire order.
    #[inline]
    pub fn split(self) -> [u7; 2] {
        [
            u7::new((self.0 & 0x7F) as u8),
            u7::new((self.0 >> 7) as u8),
        ]
    }

    /// Join a `lsb, msb` pair of 7-bit data bytes.
    #[inline]
    pub fn join(lsb: u7, msb: u7) -> u14 {
        u14((lsb.0 as u16) | ((msb.0 as u16) << 7))
    }
}

impl u7 {
    /// Cast a slice of raw bytes to a slice of data bytes, only if there are no status bytes in
    /// it.
    #[inline]
    pub fn slice_try_from_int(raw: &[u8]) -> Option<&[u7]> {
        if raw.iter().any(|&b| b > Self::MASK) {
            return None;
        }
        // SAFETY: `u7` is `repr(transparent)` over `u8` and every byte is in range.
        Some(unsafe { &*(raw as *const [u8] as *const [u7]) })
    }

    /// Cast a slice of raw bytes to a slice of data bytes.
    ///
    /// The slice is truncated up to the first status byte, if there is any.
    #[inline]
    pub fn slice_from_int(raw: &[u8]) -> &[u7] {
        let first_oob = raw
            .iter()
            .position(|&b| b > Self::MASK)
            .unwrap_or(raw.len());
        // SAFETY: `u7` is `repr(transparent)` over `u8` and the prefix holds no status bytes.
        unsafe { &*(&raw[..first_oob] as *const [u8] as *const [u7]) }
    }

    /// Cast a slice of data bytes to the corresponding raw bytes.
    #[inline]
    pub fn slice_as_int(slice: &[u7]) -> &[u8] {
        // SAFETY: `u7` is `repr(transparent)` over `u8`.
        unsafe { &*(slice as *const [u7] as *const [u8]) }
    }
}
