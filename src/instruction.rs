use crate::opcode::OpCode;

/// The classic CHIP-8 instruction set, one variant per table entry.
///
/// Decoding is kept separate from execution: `decode` is a pure mapping from
/// an instruction word to its `Operation`, and the interpreter matches on
/// the result to run the handler. Doc comments give the conventional
/// hex mnemonic for each entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// 00E0: clear the display
    ClearDisplay,
    /// 00EE: return from subroutine
    Return,
    /// 1NNN: jump to address
    Jump,
    /// 2NNN: call subroutine
    Call,
    /// 3XNN: skip next instruction if VX == NN
    SkipEqualImm,
    /// 4XNN: skip next instruction if VX != NN
    SkipNotEqualImm,
    /// 5XY0: skip next instruction if VX == VY
    SkipEqualReg,
    /// 6XNN: VX = NN
    LoadImm,
    /// 7XNN: VX += NN (no carry flag)
    AddImm,
    /// 8XY0: VX = VY
    LoadReg,
    /// 8XY1: VX |= VY
    Or,
    /// 8XY2: VX &= VY
    And,
    /// 8XY3: VX ^= VY
    Xor,
    /// 8XY4: VX += VY, VF = carry
    AddReg,
    /// 8XY5: VX -= VY, VF = no borrow
    SubReg,
    /// 8XY6: shift right, VF = bit shifted out
    ShiftRight,
    /// 8XY7: VX = VY - VX, VF = no borrow
    SubFrom,
    /// 8XYE: shift left, VF = bit shifted out
    ShiftLeft,
    /// 9XY0: skip next instruction if VX != VY
    SkipNotEqualReg,
    /// ANNN: I = NNN
    LoadIndex,
    /// BNNN: jump to NNN plus an offset register
    JumpOffset,
    /// CXNN: VX = random byte & NN
    Random,
    /// DXYN: XOR-blit an N-row sprite from memory at I, VF = collision
    Draw,
    /// EX9E: skip next instruction if key VX is pressed
    SkipKeyPressed,
    /// EXA1: skip next instruction if key VX is not pressed
    SkipKeyNotPressed,
    /// FX07: VX = delay timer
    LoadDelay,
    /// FX0A: block until a key is pressed, store it in VX
    WaitKey,
    /// FX15: delay timer = VX
    SetDelayTimer,
    /// FX18: sound timer = VX
    SetSoundTimer,
    /// FX1E: I += VX
    AddIndex,
    /// FX29: I = address of the glyph for the low nibble of VX
    LoadGlyph,
    /// FX33: store BCD of VX at I, I+1, I+2
    StoreBcd,
    /// FX55: store V0..=VX to memory at I
    StoreRegisters,
    /// FX65: load V0..=VX from memory at I
    LoadRegisters,
}

/// Classify an instruction word. The top nibble selects the group; the
/// ambiguous groups 0x0, 0x8, 0xE and 0xF discriminate further on the low
/// byte or low nibble. A word matching no table entry yields `None`, which
/// the interpreter turns into a fatal error rather than a silent no-op.
pub fn decode(op: OpCode) -> Option<Operation> {
    Some(match op.cmd() {
        0x0 => match op.nn() {
            0xE0 => Operation::ClearDisplay,
            0xEE => Operation::Return,
            // 0NNN machine subroutines are not supported
            _ => return None,
        },
        0x1 => Operation::Jump,
        0x2 => Operation::Call,
        0x3 => Operation::SkipEqualImm,
        0x4 => Operation::SkipNotEqualImm,
        0x5 => Operation::SkipEqualReg,
        0x6 => Operation::LoadImm,
        0x7 => Operation::AddImm,
        0x8 => match op.n() {
            0x0 => Operation::LoadReg,
            0x1 => Operation::Or,
            0x2 => Operation::And,
            0x3 => Operation::Xor,
            0x4 => Operation::AddReg,
            0x5 => Operation::SubReg,
            0x6 => Operation::ShiftRight,
            0x7 => Operation::SubFrom,
            0xE => Operation::ShiftLeft,
            _ => return None,
        },
        0x9 => Operation::SkipNotEqualReg,
        0xA => Operation::LoadIndex,
        0xB => Operation::JumpOffset,
        0xC => Operation::Random,
        0xD => Operation::Draw,
        0xE => match op.nn() {
            0x9E => Operation::SkipKeyPressed,
            0xA1 => Operation::SkipKeyNotPressed,
            _ => return None,
        },
        0xF => match op.nn() {
            0x07 => Operation::LoadDelay,
            0x0A => Operation::WaitKey,
            0x15 => Operation::SetDelayTimer,
            0x18 => Operation::SetSoundTimer,
            0x1E => Operation::AddIndex,
            0x29 => Operation::LoadGlyph,
            0x33 => Operation::StoreBcd,
            0x55 => Operation::StoreRegisters,
            0x65 => Operation::LoadRegisters,
            _ => return None,
        },
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(word: u16) -> Option<Operation> {
        decode(OpCode::new(word))
    }

    #[test]
    fn test_decode_system_group() {
        assert_eq!(d(0x00E0), Some(Operation::ClearDisplay));
        assert_eq!(d(0x00EE), Some(Operation::Return));
    }

    #[test]
    fn test_decode_single_level_groups() {
        assert_eq!(d(0x1234), Some(Operation::Jump));
        assert_eq!(d(0x2234), Some(Operation::Call));
        assert_eq!(d(0x3A12), Some(Operation::SkipEqualImm));
        assert_eq!(d(0x4A12), Some(Operation::SkipNotEqualImm));
        assert_eq!(d(0x5AB0), Some(Operation::SkipEqualReg));
        assert_eq!(d(0x6A12), Some(Operation::LoadImm));
        assert_eq!(d(0x7A12), Some(Operation::AddImm));
        assert_eq!(d(0x9AB0), Some(Operation::SkipNotEqualReg));
        assert_eq!(d(0xA123), Some(Operation::LoadIndex));
        assert_eq!(d(0xB123), Some(Operation::JumpOffset));
        assert_eq!(d(0xC1FF), Some(Operation::Random));
        assert_eq!(d(0xD125), Some(Operation::Draw));
    }

    #[test]
    fn test_decode_arithmetic_group() {
        assert_eq!(d(0x8AB0), Some(Operation::LoadReg));
        assert_eq!(d(0x8AB1), Some(Operation::Or));
        assert_eq!(d(0x8AB2), Some(Operation::And));
        assert_eq!(d(0x8AB3), Some(Operation::Xor));
        assert_eq!(d(0x8AB4), Some(Operation::AddReg));
        assert_eq!(d(0x8AB5), Some(Operation::SubReg));
        assert_eq!(d(0x8AB6), Some(Operation::ShiftRight));
        assert_eq!(d(0x8AB7), Some(Operation::SubFrom));
        assert_eq!(d(0x8ABE), Some(Operation::ShiftLeft));
    }

    #[test]
    fn test_decode_key_and_misc_groups() {
        assert_eq!(d(0xEA9E), Some(Operation::SkipKeyPressed));
        assert_eq!(d(0xEAA1), Some(Operation::SkipKeyNotPressed));
        assert_eq!(d(0xFA07), Some(Operation::LoadDelay));
        assert_eq!(d(0xFA0A), Some(Operation::WaitKey));
        assert_eq!(d(0xFA15), Some(Operation::SetDelayTimer));
        assert_eq!(d(0xFA18), Some(Operation::SetSoundTimer));
        assert_eq!(d(0xFA1E), Some(Operation::AddIndex));
        assert_eq!(d(0xFA29), Some(Operation::LoadGlyph));
        assert_eq!(d(0xFA33), Some(Operation::StoreBcd));
        assert_eq!(d(0xFA55), Some(Operation::StoreRegisters));
        assert_eq!(d(0xFA65), Some(Operation::LoadRegisters));
    }

    #[test]
    fn test_decode_unknown_words() {
        assert_eq!(d(0x0000), None);
        assert_eq!(d(0x00FF), None);
        assert_eq!(d(0x8AB8), None);
        assert_eq!(d(0x8ABF), None);
        assert_eq!(d(0xE000), None);
        assert_eq!(d(0xEAFF), None);
        assert_eq!(d(0xF000), None);
        assert_eq!(d(0xFA66), None);
    }
}
