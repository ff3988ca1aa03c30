//! Hints Module
//!
//! ICCCM `WM_NORMAL_HINTS` (XSizeHints equivalent) as published for the
//! output window.

/// Program specified position
pub const P_POSITION: u32 = 1 << 2;
/// Program specified minimum size
pub const P_MIN_SIZE: u32 = 1 << 4;
/// Program specified maximum size
pub const P_MAX_SIZE: u32 = 1 << 5;

/// Number of 32-bit words in a `WM_SIZE_HINTS` property
pub const SIZE_HINTS_WORDS: usize = 18;

/// Size hints (XSizeHints equivalent)
///
/// Only the fields the benchmark window uses are carried; the remaining words
/// of the property are written as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeHints {
    pub flags: u32,
    pub x: i32,
    pub y: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl SizeHints {
    /// Hints pinning the window to exactly `width` x `height`
    pub fn fixed(width: i32, height: i32) -> Self {
        Self {
            flags: P_MIN_SIZE | P_MAX_SIZE,
            min_width: width,
            min_height: height,
            max_width: width,
            max_height: height,
            ..Self::default()
        }
    }

    /// Add a program specified position
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self.flags |= P_POSITION;
        self
    }

    /// Encode as the 18 words of a `WM_SIZE_HINTS` property
    pub fn to_words(&self) -> [u32; SIZE_HINTS_WORDS] {
        let mut words = [0u32; SIZE_HINTS_WORDS];
        words[0] = self.flags;
        words[1] = self.x as u32;
        words[2] = self.y as u32;
        // words 3 and 4 (width, height) are obsolete
        words[5] = self.min_width as u32;
        words[6] = self.min_height as u32;
        words[7] = self.max_width as u32;
        words[8] = self.max_height as u32;
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_size_words() {
        let words = SizeHints::fixed(800, 600).to_words();

        assert_eq!(words[0], P_MIN_SIZE | P_MAX_SIZE);
        assert_eq!(&words[5..9], &[800, 600, 800, 600]);
        assert_eq!(words[1], 0);
        assert_eq!(words[2], 0);
        assert!(words[9..].iter().all(|&w| w == 0));
    }

    #[test]
    fn test_position_sets_flag() {
        let hints = SizeHints::fixed(640, 480).with_position(-10, 20);
        let words = hints.to_words();

        assert_eq!(words[0], P_MIN_SIZE | P_MAX_SIZE | P_POSITION);
        assert_eq!(words[1] as i32, -10);
        assert_eq!(words[2], 20);
        assert_eq!(words[0] & !(P_MIN_SIZE | P_MAX_SIZE | P_POSITION), 0);
    }
}
