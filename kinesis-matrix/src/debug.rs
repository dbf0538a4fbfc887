//! Human readable matrix dump.

use ufmt::uWrite;

use crate::word::RowWord;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn hex_digit(value: usize) -> char {
    HEX[value & 0xF] as char
}

/// Write the committed state, one line per row, bits LSB first.
///
/// ```text
/// r/c 01234567
/// 00: 10000000
/// 01: 00000000 <ghost
/// ```
///
/// `ghost` is asked for each row and should answer `false` when ghost
/// detection is disabled.
pub fn print_matrix<Wr, W>(
    out: &mut Wr,
    rows: &[W],
    cols: usize,
    ghost: impl Fn(usize) -> bool,
) -> Result<(), Wr::Error>
where
    Wr: uWrite + ?Sized,
    W: RowWord,
{
    out.write_str("\nr/c ")?;
    for col in 0..cols {
        out.write_char(hex_digit(col))?;
    }
    out.write_char('\n')?;

    for (row, &word) in rows.iter().enumerate() {
        out.write_char(hex_digit(row >> 4))?;
        out.write_char(hex_digit(row))?;
        out.write_str(": ")?;
        for col in 0..cols {
            out.write_char(if word.is_set(col) { '1' } else { '0' })?;
        }
        if ghost(row) {
            out.write_str(" <ghost")?;
        }
        out.write_char('\n')?;
    }

    Ok(())
}
