//! Static keymap tables and the Fn indirection tables.
//!
//! Tables are generated at build time from the board layouts, so every
//! index the firmware produces is in range by construction. An index out
//! of range is a caller bug and panics.

/// Number of Fn keys.
pub const FN_KEYS: usize = 8;
/// Key code of `FN0`; `FN0..=FN7` are consecutive.
pub const FN_BASE: u8 = 0xE8;

/// Fn index of a key code, if it is one of `FN0..=FN7`.
pub fn fn_index(code: u8) -> Option<usize> {
    code.checked_sub(FN_BASE)
        .map(usize::from)
        .filter(|&index| index < FN_KEYS)
}

/// Per-layer key codes plus the Fn tables of one board.
#[derive(Debug)]
pub struct Keymap<const LAYERS: usize, const ROWS: usize, const COLS: usize> {
    layers: &'static [[[u8; COLS]; ROWS]; LAYERS],
    fn_layer: [u8; FN_KEYS],
    fn_keycode: [u8; FN_KEYS],
}

impl<const LAYERS: usize, const ROWS: usize, const COLS: usize> Keymap<LAYERS, ROWS, COLS> {
    pub const fn new(
        layers: &'static [[[u8; COLS]; ROWS]; LAYERS],
        fn_layer: [u8; FN_KEYS],
        fn_keycode: [u8; FN_KEYS],
    ) -> Self {
        assert!(LAYERS > 0, "keymap needs at least one layer");
        Self {
            layers,
            fn_layer,
            fn_keycode,
        }
    }

    /// Key code stored at `(layer, row, col)`.
    pub fn lookup(&self, layer: usize, row: usize, col: usize) -> u8 {
        self.layers[layer][row][col]
    }

    /// Layer activated by Fn key `index`.
    pub fn fn_layer(&self, index: usize) -> u8 {
        self.fn_layer[index]
    }

    /// Key code sent when Fn key `index` is tapped.
    pub fn fn_keycode(&self, index: usize) -> u8 {
        self.fn_keycode[index]
    }

    pub const fn layer_count(&self) -> usize {
        LAYERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: [[[u8; 3]; 2]; 2] = [
        [[0x29, 0x04, 0x05], [0xE8, 0x00, 0x2C]],
        [[0x00, 0x3A, 0x3B], [0x00, 0x00, 0x4F]],
    ];

    static KEYMAP: Keymap<2, 2, 3> = Keymap::new(
        &TABLE,
        [1, 0, 0, 0, 0, 0, 0, 0],
        [0x2A, 0, 0, 0, 0, 0, 0, 0],
    );

    #[test]
    fn test_lookup() {
        assert_eq!(KEYMAP.lookup(0, 0, 0), 0x29);
        assert_eq!(KEYMAP.lookup(0, 1, 2), 0x2C);
        assert_eq!(KEYMAP.lookup(1, 0, 1), 0x3A);
        // Same arguments, same answer.
        assert_eq!(KEYMAP.lookup(1, 1, 2), KEYMAP.lookup(1, 1, 2));
        assert_eq!(KEYMAP.layer_count(), 2);
    }

    #[test]
    fn test_fn_tables() {
        let code = KEYMAP.lookup(0, 1, 0);
        let index = fn_index(code).unwrap();
        assert_eq!(index, 0);
        assert_eq!(KEYMAP.fn_layer(index), 1);
        assert_eq!(KEYMAP.fn_keycode(index), 0x2A);
    }

    #[test]
    fn test_fn_index_range() {
        assert_eq!(fn_index(0xE7), None);
        assert_eq!(fn_index(0xEF), Some(7));
        assert_eq!(fn_index(0xF0), None);
        assert_eq!(fn_index(0x04), None);
    }

    #[test]
    #[should_panic]
    fn test_undeclared_layer_panics() {
        KEYMAP.lookup(2, 0, 0);
    }

    #[test]
    #[should_panic]
    fn test_fn_index_out_of_range_panics() {
        KEYMAP.fn_layer(FN_KEYS);
    }
}
