//! Keyboard Module
//!
//! Keycode to keysym translation from the server's keyboard mapping.

use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, Keycode, Keysym};

use crate::error::Result;

// Keysym constants from X11/keysymdef.h
pub const NO_SYMBOL: Keysym = 0;
pub const XK_ESCAPE: Keysym = 0xFF1B;

/// Snapshot of the server keyboard mapping
#[derive(Debug, Clone)]
pub struct KeyboardMap {
    min_keycode: Keycode,
    keysyms_per_keycode: usize,
    keysyms: Vec<Keysym>,
}

impl KeyboardMap {
    /// Fetch the mapping for every keycode the server reports
    pub fn fetch<C: Connection>(conn: &C) -> Result<Self> {
        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let count = (setup.max_keycode - min_keycode).saturating_add(1);

        let reply = conn.get_keyboard_mapping(min_keycode, count)?.reply()?;
        debug!(
            "Keyboard mapping: {} keycodes from {}, {} keysyms per keycode",
            count, min_keycode, reply.keysyms_per_keycode
        );

        Ok(Self::from_parts(
            min_keycode,
            reply.keysyms_per_keycode,
            reply.keysyms,
        ))
    }

    pub fn from_parts(min_keycode: Keycode, keysyms_per_keycode: u8, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode: keysyms_per_keycode as usize,
            keysyms,
        }
    }

    /// Keysym in `column` for `keycode` (column 0 is the unshifted symbol).
    ///
    /// Returns `NO_SYMBOL` for keycodes or columns outside the mapping.
    pub fn keysym(&self, keycode: Keycode, column: usize) -> Keysym {
        if keycode < self.min_keycode || column >= self.keysyms_per_keycode {
            return NO_SYMBOL;
        }
        let idx = (keycode - self.min_keycode) as usize * self.keysyms_per_keycode + column;
        self.keysyms.get(idx).copied().unwrap_or(NO_SYMBOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> KeyboardMap {
        // keycode 8: a/A, keycode 9: Escape, keycode 10: unmapped
        KeyboardMap::from_parts(8, 2, vec![0x61, 0x41, XK_ESCAPE, NO_SYMBOL, NO_SYMBOL, NO_SYMBOL])
    }

    #[test]
    fn test_keysym_lookup() {
        let map = sample_map();
        assert_eq!(map.keysym(9, 0), XK_ESCAPE);
        assert_eq!(map.keysym(8, 0), 0x61);
        assert_eq!(map.keysym(8, 1), 0x41);
        assert_eq!(map.keysym(10, 0), NO_SYMBOL);
    }

    #[test]
    fn test_out_of_range() {
        let map = sample_map();
        assert_eq!(map.keysym(7, 0), NO_SYMBOL);
        assert_eq!(map.keysym(11, 0), NO_SYMBOL);
        assert_eq!(map.keysym(9, 2), NO_SYMBOL);
    }
}
