//! 7-segment patterns for decimal digits
//!
//! Segment layout:
//! ```text
//!    AAAAA
//!   F     B
//!   F     B
//!    GGGGG
//!   E     C
//!   E     C
//!    DDDDD
//! ```

/// Lit segments, bit 0 = a ... bit 6 = g
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segments(u8);

impl Segments {
    pub const A: u8 = 1 << 0;
    pub const B: u8 = 1 << 1;
    pub const C: u8 = 1 << 2;
    pub const D: u8 = 1 << 3;
    pub const E: u8 = 1 << 4;
    pub const F: u8 = 1 << 5;
    pub const G: u8 = 1 << 6;

    const DIGITS: [u8; 10] = [
        Self::A | Self::B | Self::C | Self::D | Self::E | Self::F,
        Self::B | Self::C,
        Self::A | Self::B | Self::D | Self::E | Self::G,
        Self::A | Self::B | Self::C | Self::D | Self::G,
        Self::B | Self::C | Self::F | Self::G,
        Self::A | Self::C | Self::D | Self::F | Self::G,
        Self::A | Self::C | Self::D | Self::E | Self::F | Self::G,
        Self::A | Self::B | Self::C,
        Self::A | Self::B | Self::C | Self::D | Self::E | Self::F | Self::G,
        Self::A | Self::B | Self::C | Self::D | Self::F | Self::G,
    ];

    /// All segments dark
    pub const fn blank() -> Self {
        Self(0)
    }

    /// Pattern for a decimal digit, `None` above 9
    pub const fn from_digit(digit: u8) -> Option<Self> {
        if digit < 10 {
            Some(Self(Self::DIGITS[digit as usize]))
        } else {
            None
        }
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Whether segment `index` (0 = a) is lit
    pub const fn is_lit(&self, index: usize) -> bool {
        index < 7 && self.0 & (1 << index) != 0
    }

    pub const fn count_lit(&self) -> u32 {
        self.0.count_ones()
    }
}
