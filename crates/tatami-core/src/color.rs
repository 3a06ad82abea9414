#![forbid(unsafe_code)]

//! Terminal colors.
//!
//! Styling is limited to per-cell foreground/background color drawn from
//! the 16 standard ANSI colors. Widgets inherit colors from ancestor
//! color decorators during layout; the defaults are white on black.

/// Standard 16 ANSI colors (indices 0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    /// Black (index 0).
    Black = 0,
    /// Red (index 1).
    Red = 1,
    /// Green (index 2).
    Green = 2,
    /// Yellow (index 3).
    Yellow = 3,
    /// Blue (index 4).
    Blue = 4,
    /// Magenta (index 5).
    Magenta = 5,
    /// Cyan (index 6).
    Cyan = 6,
    /// White (index 7).
    White = 7,
    /// Bright black (index 8).
    BrightBlack = 8,
    /// Bright red (index 9).
    BrightRed = 9,
    /// Bright green (index 10).
    BrightGreen = 10,
    /// Bright yellow (index 11).
    BrightYellow = 11,
    /// Bright blue (index 12).
    BrightBlue = 12,
    /// Bright magenta (index 13).
    BrightMagenta = 13,
    /// Bright cyan (index 14).
    BrightCyan = 14,
    /// Bright white (index 15).
    BrightWhite = 15,
}

impl Color {
    /// Default foreground for nodes with no color decorator above them.
    pub const DEFAULT_FOREGROUND: Self = Self::White;

    /// Default background for nodes with no color decorator above them.
    pub const DEFAULT_BACKGROUND: Self = Self::Black;

    /// Return the raw ANSI index (0-15).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert a `u8` index to a `Color`, returning `None` if out of range.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Black),
            1 => Some(Self::Red),
            2 => Some(Self::Green),
            3 => Some(Self::Yellow),
            4 => Some(Self::Blue),
            5 => Some(Self::Magenta),
            6 => Some(Self::Cyan),
            7 => Some(Self::White),
            8 => Some(Self::BrightBlack),
            9 => Some(Self::BrightRed),
            10 => Some(Self::BrightGreen),
            11 => Some(Self::BrightYellow),
            12 => Some(Self::BrightBlue),
            13 => Some(Self::BrightMagenta),
            14 => Some(Self::BrightCyan),
            15 => Some(Self::BrightWhite),
            _ => None,
        }
    }

    /// Check if this is one of the bright variants (indices 8-15).
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self.as_u8() >= 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_u8_round_trips_through_from_u8() {
        for idx in 0..16u8 {
            let color = Color::from_u8(idx).expect("index 0-15 is a color");
            assert_eq!(color.as_u8(), idx);
        }
    }

    #[test]
    fn from_u8_rejects_out_of_range() {
        assert_eq!(Color::from_u8(16), None);
        assert_eq!(Color::from_u8(255), None);
    }

    #[test]
    fn bright_split() {
        assert!(!Color::White.is_bright());
        assert!(Color::BrightBlack.is_bright());
        assert!(Color::BrightWhite.is_bright());
    }
}
