//! Wire vocabulary shared by the controller core and board implementations.
//!
//! Opcodes and replies are three ASCII letters packed big-endian into the low
//! 24 bits of a `u32` (`"DON"` -> `0x00444F4E`).

/// Timing-generator board.
pub const TIM_ID: u32 = 2;

/// Unconditional success reply.
pub const DON: u32 = ascii_code(*b"DON");
/// Conventional failure reply.
pub const ERR: u32 = ascii_code(*b"ERR");

/// Pack three ASCII letters into a command/reply word.
#[inline]
pub const fn ascii_code(letters: [u8; 3]) -> u32 {
    ((letters[0] as u32) << 16) | ((letters[1] as u32) << 8) | (letters[2] as u32)
}

/// Inverse of [`ascii_code`]. Returns `None` if any byte is not printable
/// ASCII or the top byte is set.
pub fn ascii_letters(code: u32) -> Option<[u8; 3]> {
    if code >> 24 != 0 {
        return None;
    }
    let letters = [(code >> 16) as u8, (code >> 8) as u8, code as u8];
    letters
        .iter()
        .all(|b| b.is_ascii_graphic())
        .then_some(letters)
}
