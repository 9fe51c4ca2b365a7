/// where the font lives, inside the reserved interpreter area
pub const FONT_BASE: u16 = 0x050;

/// bytes per glyph
pub const GLYPH_SIZE: u16 = 5;

pub const FONTSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// address of the glyph for `digit`
pub fn glyph_address(digit: u8) -> u16 {
    FONT_BASE + GLYPH_SIZE * digit as u16
}

/// the 5 rows of the glyph for a hex digit
pub fn glyph(digit: u8) -> &'static [u8] {
    let start = (GLYPH_SIZE * (digit & 0xF) as u16) as usize;
    &FONTSET[start..start + GLYPH_SIZE as usize]
}
