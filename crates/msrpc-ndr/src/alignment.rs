//! NDR alignment rules
//!
//! Every scalar is aligned to its natural size, capped at 4 bytes unless the
//! scalar is declared 8 bytes wide:
//!
//! | Width | Alignment |
//! |-------|-----------|
//! | 1     | 1         |
//! | 2     | 2         |
//! | 4     | 4         |
//! | 8     | 8         |
//!
//! A structure aligns to its most strictly aligned scalar member. Pad bytes
//! are always zero.

use std::fmt;

/// Alignment boundary in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Alignment {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::One,
        Alignment::Two,
        Alignment::Four,
        Alignment::Eight,
    ];

    /// Boundary size in bytes
    #[inline]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Alignment of a scalar of the given width
    pub const fn for_width(width: usize) -> Alignment {
        match width {
            0 | 1 => Alignment::One,
            2 | 3 => Alignment::Two,
            8 => Alignment::Eight,
            _ => Alignment::Four,
        }
    }

    /// Padding needed to move `position` onto this boundary
    #[inline]
    pub const fn padding(self, position: usize) -> usize {
        let remainder = position % self.bytes();
        if remainder == 0 {
            0
        } else {
            self.bytes() - remainder
        }
    }

    /// Smallest position >= `position` that is a multiple of this boundary
    #[inline]
    pub const fn align(self, position: usize) -> usize {
        position + self.padding(position)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-byte", self.bytes())
    }
}
