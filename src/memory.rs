use crate::error::Chip8Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const MEMORY_SIZE: usize = 0x1000;

/// where the built-in glyph font lives
pub const FONT_ADDR: u16 = 0x050;

/// where programs are loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// first address past the program region
pub const PROGRAM_END: u16 = 0x0E8F;

/// each hexadecimal glyph is 5 bytes tall
pub const GLYPH_SIZE: u16 = 5;

/// Defines the CHIP-8 memory map:
///
///   0x0000-0x01ff  reserved for the interpreter (glyph font at 0x050)
///   0x0200-0x0e8e  program / data space
///
/// The stack and display of this architecture live outside addressable
/// memory, so the map reduces to the two regions above. All byte accesses
/// mask the address into the 4K space.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// initialises RAM with the glyph font baked in
    pub fn new() -> Self {
        let mut m = Memory {
            bytes: [0u8; MEMORY_SIZE],
        };
        let start = FONT_ADDR as usize;
        m.bytes[start..start + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        m
    }

    /// load a CHIP-8 program at 0x200. Programs larger than the program
    /// region are rejected outright; memory is untouched on failure.
    pub fn load_program(&mut self, code: &[u8]) -> Result<(), Chip8Error> {
        if code.len() > (PROGRAM_END - PROGRAM_ADDR) as usize {
            return Err(Chip8Error::RomTooLarge(code.len()));
        }
        let start = PROGRAM_ADDR as usize;
        self.bytes[start..start + code.len()].copy_from_slice(code);
        Ok(())
    }

    /// get a two-byte big-endian word (instruction fetch)
    pub fn get_word(&self, addr: u16) -> u16 {
        (self.get_byte(addr) as u16) << 8 | self.get_byte(addr.wrapping_add(1)) as u16
    }

    pub fn get_byte(&self, addr: u16) -> u8 {
        self.bytes[addr as usize % MEMORY_SIZE]
    }

    pub fn set_byte(&mut self, addr: u16, val: u8) {
        self.bytes[addr as usize % MEMORY_SIZE] = val;
    }

    /// get a r/o slice of the underlying memory
    pub fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes[a..(a + len)]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}

/// built-in hexadecimal digit sprites, 8x5 pixels each
const CHIP8_FONT: [u8; 80] = [
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_region_zeroed() {
        let m = Memory::new();
        // NB. memory below 0x200 holds the font; everything above starts blank
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_font_loaded_at_construction() {
        let m = Memory::new();
        assert_eq!(
            m.get_ro_slice(FONT_ADDR, 5),
            &[0xF0, 0x90, 0x90, 0x90, 0xF0]
        );
        let f = FONT_ADDR + 0xF * GLYPH_SIZE;
        assert_eq!(m.get_ro_slice(f, 5), &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn test_program_load_ok() {
        let mut m = Memory::new();
        m.load_program(&[0x00, 0xe0]).unwrap();
        assert_eq!(m.get_ro_slice(0x200, 2), &[0x00, 0xe0]);
    }

    #[test]
    fn test_program_load_round_trip() {
        let mut m = Memory::new();
        let prog: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
        m.load_program(&prog).unwrap();
        assert_eq!(m.get_ro_slice(PROGRAM_ADDR, 1024), prog.as_slice());
    }

    #[test]
    fn test_program_load_fills_region() {
        let mut m = Memory::new();
        let prog = vec![0xAB; (PROGRAM_END - PROGRAM_ADDR) as usize];
        assert!(m.load_program(&prog).is_ok());
    }

    #[test]
    fn test_program_too_large_rejected() {
        let mut m = Memory::new();
        m.load_program(&[0x11, 0x22]).unwrap();
        let prog = vec![0xAB; (PROGRAM_END - PROGRAM_ADDR) as usize + 1];
        match m.load_program(&prog) {
            Err(Chip8Error::RomTooLarge(len)) => assert_eq!(len, prog.len()),
            other => panic!("expected RomTooLarge, got {:?}", other),
        }
        // prior contents survive a rejected load
        assert_eq!(m.get_ro_slice(0x200, 2), &[0x11, 0x22]);
    }

    #[test]
    fn test_get_word() {
        let mut m = Memory::new();
        m.set_byte(0x204, 0xDE);
        m.set_byte(0x205, 0xAD);
        assert_eq!(m.get_word(0x204), 0xDEAD);
    }

    #[test]
    fn test_byte_access_wraps_address() {
        let mut m = Memory::new();
        m.set_byte(0x1000, 0x42);
        assert_eq!(m.get_byte(0x0000), 0x42);
    }
}
