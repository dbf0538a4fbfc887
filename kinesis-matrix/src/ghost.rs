//! Ghost key detection.
//!
//! A diode-less matrix cannot tell three keys forming the corners of a
//! rectangle from four. A row is suspect when it has two or more keys down
//! and some other row has at least the same keys down.

use crate::word::RowWord;

pub fn row_has_ghost<W: RowWord>(rows: &[W], row: usize) -> bool {
    let pattern = rows[row];
    if pattern.at_most_one() {
        return false;
    }

    rows.iter()
        .enumerate()
        .any(|(i, &other)| i != row && other & pattern == pattern)
}

pub fn has_ghost<W: RowWord>(rows: &[W]) -> bool {
    (0..rows.len()).any(|row| row_has_ghost(rows, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_is_ghost() {
        let rows: [u8; 3] = [0b0101, 0b0101, 0];
        assert!(row_has_ghost(&rows, 0));
        assert!(row_has_ghost(&rows, 1));
        assert!(!row_has_ghost(&rows, 2));
        assert!(has_ghost(&rows));
    }

    #[test]
    fn test_superset_row() {
        let rows: [u16; 2] = [0b0011, 0b1011];
        assert!(row_has_ghost(&rows, 0));
        // The wider row is not covered by the narrower one.
        assert!(!row_has_ghost(&rows, 1));
    }

    #[test]
    fn test_single_keys_never_ghost() {
        let rows: [u8; 4] = [0b1000, 0b1000, 0b1000, 0];
        assert!(!has_ghost(&rows));
    }

    #[test]
    fn test_disjoint_rows() {
        let rows: [u8; 2] = [0b0011, 0b1100];
        assert!(!has_ghost(&rows));
    }
}
