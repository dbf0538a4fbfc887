//! Board modules generated from `layouts/*.json` by the build script.
//!
//! Each module carries the matrix size, row and column wiring, debounce
//! policy and keymap of one board.

include!(concat!(env!("OUT_DIR"), "/boards.rs"));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::Bench;
    use crate::debounce::{Debounce, Policy};
    use crate::keymap::fn_index;
    use crate::pin::{ColumnWiring, PinId, PortId};

    #[test]
    fn test_board_list() {
        assert!(BOARDS.contains(&"btkinesis"));
        assert!(BOARDS.contains(&"uberkinesis"));
    }

    #[test]
    fn test_btkinesis_tables() {
        use btkinesis::*;

        assert_eq!((ROWS, COLS), (12, 8));
        assert_eq!(POLICY, Policy::SwapBuffer);
        assert_eq!(DEBOUNCE, 0);
        assert!(GHOST_DETECTION);
        assert_eq!(ROW_PINS[0], PinId::new(PortId::F, 0));
        assert_eq!(ROW_PINS[11], PinId::new(PortId::E, 2));
        assert_eq!(COLUMNS, ColumnWiring::Port(PortId::B));
        assert_eq!(LAYER_NAMES, ["Dvorak", "QWERTY", "Navigation"]);

        assert_eq!(KEYMAP.lookup(0, 0, 0), 0x29);
        // Home row: A on both layouts, S (Dvorak O) under the ring finger.
        assert_eq!(KEYMAP.lookup(0, 3, 1), 0x04);
        assert_eq!(KEYMAP.lookup(0, 3, 2), 0x12);
        assert_eq!(KEYMAP.lookup(1, 3, 2), 0x16);
        // Unused cell.
        assert_eq!(KEYMAP.lookup(0, 1, 7), 0x00);

        let index = fn_index(KEYMAP.lookup(0, 7, 1)).unwrap();
        assert_eq!(index, 2);
        assert_eq!(KEYMAP.fn_layer(index), 2);
        assert_eq!(KEYMAP.fn_keycode(index), 0x38);
    }

    #[test]
    fn test_uberkinesis_tables() {
        use uberkinesis::*;

        assert_eq!(POLICY, Policy::ShadowCommit);
        assert_eq!((DEBOUNCE, PAUSE_MS), (5, 1));
        assert!(!GHOST_DETECTION);
        assert_eq!(ROW_PINS[11], PinId::new(PortId::E, 6));
        assert_eq!(KEYMAP.layer_count(), 2);
        assert_eq!(debouncer().threshold(), 5);
        assert_eq!(debouncer().pause_ms(), 1);
    }

    #[test]
    fn test_btkinesis_scan() {
        use btkinesis::*;

        let bench = Bench::<{ ROWS }>::new();
        let mut matrix = bench
            .matrix::<Word, _, { COLS }>(debouncer())
            .with_ghost_detection(GHOST_DETECTION);

        bench.press(3, 1);
        matrix.scan();
        assert!(matrix.is_modified());
        assert!(matrix.is_on(3, 1));
        assert_eq!(KEYMAP.lookup(0, 3, 1), 0x04);
        assert!(!matrix.has_ghost());
    }

    #[test]
    fn test_uberkinesis_scan() {
        use uberkinesis::*;

        let bench = Bench::<{ ROWS }>::new();
        let mut matrix = bench.matrix::<Word, _, { COLS }>(debouncer());

        bench.press(9, 1);
        for _ in 0..usize::from(DEBOUNCE) {
            matrix.scan();
        }
        assert!(matrix.is_on(9, 1));
        assert_eq!(KEYMAP.lookup(0, 9, 1), 0x2C);
        assert_eq!(bench.delayed_ms(), u32::from(DEBOUNCE - 1) * PAUSE_MS);
    }
}
