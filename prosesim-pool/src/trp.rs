//! Time repetition pattern (T-RPT) tables.
//!
//! Index I-TRP selects an 8-subframe repetition pattern together with its
//! repetition count k. Patterns are stored MSB first: bit 7 of the byte is
//! the pattern bit for the first subframe of each 8-subframe window.

/// Repetition count k for each pattern index.
///
/// Index 36 carries k=2 in the deployed table even though its pattern has
/// four bits set; the table is reproduced as broadcast.
pub const ITRP_KTRP: [u8; 107] = [
    1, 1, 1, 1, 1, 1, 1, 1, // 0..=7
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    2, // 8..=36
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    4, 4, 4, 4, 4, 4, 4, // 37..=105
    8, // 106
];

/// Bitmap template for each pattern index, MSB first.
///
/// Indices 61 and 62 both hold `11000110`; the table ships with this
/// duplicate and is reproduced as broadcast.
pub const ITRP_TEMPLATE: [u8; 107] = [
    // k = 1
    0b10000000, 0b01000000, 0b00100000, 0b00010000, 0b00001000, 0b00000100, 0b00000010, 0b00000001,
    // k = 2
    0b11000000, 0b10100000, 0b01100000, 0b10010000, 0b01010000, 0b00110000, 0b10001000, 0b01001000,
    0b00101000, 0b00011000, 0b10000100, 0b01000100, 0b00100100, 0b00010100, 0b00001100, 0b10000010,
    0b01000010, 0b00100010, 0b00010010, 0b00001010, 0b00000110, 0b10000001, 0b01000001, 0b00100001,
    0b00010001, 0b00001001, 0b00000101, 0b00000011,
    // k = 4
    0b11110000, 0b11101000, 0b11011000, 0b10111000, 0b01111000, 0b11100100, 0b11010100, 0b10110100,
    0b01110100, 0b11001100, 0b10101100, 0b01101100, 0b10011100, 0b01011100, 0b00111100, 0b11100010,
    0b11010010, 0b10110010, 0b01110010, 0b11001010, 0b10101010, 0b01101010, 0b10011010, 0b01011010,
    0b00111010, 0b11000110, 0b11000110, 0b01100110, 0b10010110, 0b01010110, 0b00110110, 0b10001110,
    0b01001110, 0b00101110, 0b00011110, 0b11100001, 0b11010001, 0b10110001, 0b01110001, 0b11001001,
    0b10101001, 0b01101001, 0b10011001, 0b01011001, 0b00111001, 0b11000101, 0b10100101, 0b01100101,
    0b10010101, 0b01010101, 0b00110101, 0b10001101, 0b01001101, 0b00101101, 0b00011101, 0b11000011,
    0b10100011, 0b01100011, 0b10010011, 0b01010011, 0b00110011, 0b10001011, 0b01001011, 0b00101011,
    0b00011011, 0b10000111, 0b01000111, 0b00100111, 0b00010111, 0b00001111,
    // k = 8
    0b11111111,
];

/// Repetition count k of pattern `itrp`.
///
/// # Panics
///
/// Panics if `itrp` is outside the table.
pub fn ktrp(itrp: u8) -> u8 {
    ITRP_KTRP[itrp as usize]
}

/// True if bit `i` (0 = first subframe of the window) of pattern `itrp` is
/// set.
///
/// # Panics
///
/// Panics if `itrp` is outside the table.
pub fn template_bit(itrp: u8, i: usize) -> bool {
    let template = ITRP_TEMPLATE[itrp as usize];
    (template >> (7 - (i % 8))) & 0x1 == 0x1
}
