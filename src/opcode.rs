/// CHIP-8 instructions are 16 bits wide, most-significant byte first, and
/// pack their operands into fixed nibble fields:
///
/// ```text
///   0xCXYN
///     |||`- n:   low nibble (sprite height, 8XY_ sub-code)
///     ||`-- y:   register index, bits 4-7
///     |`--- x:   register index, bits 8-11
///     `---- cmd: instruction group, bits 12-15
///
///   nn  = low byte    (immediate value, 0x0/0xE/0xF sub-code)
///   nnn = low 12 bits (address)
/// ```
///
/// `OpCode` is a plain view over the word; any 16-bit value is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpCode(u16);

impl OpCode {
    pub fn new(data: u16) -> Self {
        OpCode(data)
    }

    /// the raw instruction word
    pub fn data(&self) -> u16 {
        self.0
    }

    /// instruction group (top nibble)
    pub fn cmd(&self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    /// low nibble
    pub fn n(&self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// low byte
    pub fn nn(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// low 12 bits, used as an address
    pub fn nnn(&self) -> u16 {
        self.0 & 0x0FFF
    }

    /// first register index field
    pub fn x(&self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    /// second register index field
    pub fn y(&self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }
}
