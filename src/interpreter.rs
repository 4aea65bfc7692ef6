/// # interpreter
///
/// The CHIP-8 virtual machine proper: a 4K memory image, sixteen 8-bit
/// registers, a 16-bit address register, a 16-slot return stack, two 60Hz
/// countdown timers, a 64x32 framebuffer and a 16-key keypad.
///
/// The host drives a strict call/return protocol at a nominal 60Hz:
/// update keypad -> `tick()` -> read display. `tick()` runs a configured
/// number of fetch/decode/execute cycles and then steps both timers once;
/// the interpreter has no internal clock. Instruction handlers report how
/// far to advance the program counter (0 when they set it themselves,
/// 2 for a plain step, 4 to skip the following instruction).
///
/// Four quirk toggles reproduce divergent historical interpreter behavior
/// for shifts, bitwise VF reset, jump-with-offset and bulk register
/// transfers; see `Settings`.
use crate::display::{FrameBuffer, DISPLAY_CELLS, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Chip8Error;
use crate::input::Keypad;
use crate::instruction::{decode, Operation};
use crate::memory::{Memory, FONT_ADDR, GLYPH_SIZE, PROGRAM_ADDR};
use crate::opcode::OpCode;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use std::fmt;
use std::io;
use std::io::Read;

/// return addresses the stack can hold
pub const STACK_SIZE: usize = 16;

/// ticks per second the host is expected to deliver
pub const TICK_RATE_HZ: u32 = 60;

/// default instruction rate in hz
pub const DEFAULT_SPEED_HZ: u32 = 500;

/// CPU state visible to instruction handlers and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// general purpose registers V0-VF; VF doubles as the carry/collision flag
    pub v: [u8; 16],
    /// address register
    pub i: u16,
    pub pc: u16,
    pub sp: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Registers {
    fn new() -> Self {
        Registers {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_ADDR,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
        }
    }
}

/// Behavioral quirk toggles plus the instructions-per-tick budget.
///
/// The quirks change instruction semantics, not data shape; real-world roms
/// depend on one side or the other, so all four default to the modern
/// behavior (off) and are host-settable at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// 8XY1/2/3 clear VF after the bitwise op
    pub vf_reset: bool,
    /// FX55/FX65 advance I by X+1
    pub memory: bool,
    /// 8XY6/8XYE shift VX in place instead of copying from VY
    pub shifting: bool,
    /// BNNN offsets from VX instead of V0
    pub jumping: bool,
    /// instructions executed per tick; clamped to at least 1 at use
    pub cycles_per_tick: u32,
}

impl Settings {
    /// derive the per-tick budget from an instruction rate in hz
    pub fn from_speed(hz: u32) -> Self {
        Settings {
            cycles_per_tick: cycles_for_speed(hz),
            ..Settings::default()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            vf_reset: false,
            memory: false,
            shifting: false,
            jumping: false,
            cycles_per_tick: cycles_for_speed(DEFAULT_SPEED_HZ),
        }
    }
}

fn cycles_for_speed(hz: u32) -> u32 {
    ((hz + TICK_RATE_HZ - 1) / TICK_RATE_HZ).max(1)
}

pub struct Chip8Interpreter {
    memory: Memory,
    framebuffer: FrameBuffer,
    keypad: Keypad,
    regs: Registers,
    stack: [u16; STACK_SIZE],
    settings: Settings,
    awaiting_key: bool,
    rng: StdRng,
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Chip8Interpreter::with_rng(StdRng::from_entropy())
    }

    /// construct with a caller-seeded generator, so the random instruction
    /// is reproducible
    pub fn with_rng(rng: StdRng) -> Self {
        Chip8Interpreter {
            memory: Memory::new(),
            framebuffer: FrameBuffer::new(),
            keypad: Keypad::new(),
            regs: Registers::new(),
            stack: [0; STACK_SIZE],
            settings: Settings::default(),
            awaiting_key: false,
            rng,
        }
    }

    /// load a chip8 program from anything readable
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<(), Chip8Error> {
        let mut code = Vec::new();
        reader.read_to_end(&mut code)?;
        self.load_rom(&code)
    }

    /// load a chip8 program from memory
    pub fn load_rom(&mut self, code: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(code)
    }

    /// run one tick's worth of instructions, then step both timers once.
    /// The host should call this at 60hz.
    pub fn tick(&mut self) -> Result<(), Chip8Error> {
        for _ in 0..self.settings.cycles_per_tick.max(1) {
            self.execute_cycle()?;
        }
        self.regs.delay_timer = self.regs.delay_timer.saturating_sub(1);
        self.regs.sound_timer = self.regs.sound_timer.saturating_sub(1);
        Ok(())
    }

    /// fetch, decode and execute a single instruction
    pub fn execute_cycle(&mut self) -> Result<(), Chip8Error> {
        let word = self.memory.get_word(self.regs.pc);
        let code = OpCode::new(word);
        let op = decode(code).ok_or(Chip8Error::UnknownOpcode(word))?;
        let advance = self.execute(op, code)?;
        self.regs.pc = self.regs.pc.wrapping_add(advance);
        Ok(())
    }

    fn execute(&mut self, op: Operation, code: OpCode) -> Result<u16, Chip8Error> {
        let (x, y) = (code.x(), code.y());
        let advance = match op {
            Operation::ClearDisplay => {
                self.framebuffer.clear();
                2
            }
            Operation::Return => {
                // call pushes the call site, so return restores it and then
                // steps past it
                self.regs.pc = self.pop_stack()?;
                2
            }
            Operation::Jump => {
                self.regs.pc = code.nnn();
                0
            }
            Operation::Call => {
                self.push_stack(self.regs.pc)?;
                self.regs.pc = code.nnn();
                0
            }
            Operation::SkipEqualImm => skip_if(self.regs.v[x] == code.nn()),
            Operation::SkipNotEqualImm => skip_if(self.regs.v[x] != code.nn()),
            Operation::SkipEqualReg => skip_if(self.regs.v[x] == self.regs.v[y]),
            Operation::LoadImm => {
                self.regs.v[x] = code.nn();
                2
            }
            Operation::AddImm => {
                // no carry flag on the immediate form
                self.regs.v[x] = self.regs.v[x].wrapping_add(code.nn());
                2
            }
            Operation::LoadReg => {
                self.regs.v[x] = self.regs.v[y];
                2
            }
            Operation::Or => {
                self.regs.v[x] |= self.regs.v[y];
                if self.settings.vf_reset {
                    self.regs.v[0xF] = 0;
                }
                2
            }
            Operation::And => {
                self.regs.v[x] &= self.regs.v[y];
                if self.settings.vf_reset {
                    self.regs.v[0xF] = 0;
                }
                2
            }
            Operation::Xor => {
                self.regs.v[x] ^= self.regs.v[y];
                if self.settings.vf_reset {
                    self.regs.v[0xF] = 0;
                }
                2
            }
            Operation::AddReg => {
                // flag is written before the truncated sum lands in VX
                let carry = self.regs.v[x] as u16 + self.regs.v[y] as u16 > 0xFF;
                self.regs.v[0xF] = carry as u8;
                self.regs.v[x] = self.regs.v[x].wrapping_add(self.regs.v[y]);
                2
            }
            Operation::SubReg => {
                // VF = 1 when no borrow occurs (VX >= VY)
                let no_borrow = self.regs.v[x] >= self.regs.v[y];
                self.regs.v[0xF] = no_borrow as u8;
                self.regs.v[x] = self.regs.v[x].wrapping_sub(self.regs.v[y]);
                2
            }
            Operation::ShiftRight => {
                if self.settings.shifting {
                    self.regs.v[0xF] = self.regs.v[x] & 0x1;
                    self.regs.v[x] >>= 1;
                } else {
                    self.regs.v[0xF] = self.regs.v[y] & 0x1;
                    self.regs.v[x] = self.regs.v[y] >> 1;
                }
                2
            }
            Operation::SubFrom => {
                let no_borrow = self.regs.v[y] >= self.regs.v[x];
                self.regs.v[0xF] = no_borrow as u8;
                self.regs.v[x] = self.regs.v[y].wrapping_sub(self.regs.v[x]);
                2
            }
            Operation::ShiftLeft => {
                if self.settings.shifting {
                    self.regs.v[0xF] = self.regs.v[x] >> 7;
                    self.regs.v[x] <<= 1;
                } else {
                    self.regs.v[0xF] = self.regs.v[y] >> 7;
                    self.regs.v[x] = self.regs.v[y] << 1;
                }
                2
            }
            Operation::SkipNotEqualReg => skip_if(self.regs.v[x] != self.regs.v[y]),
            Operation::LoadIndex => {
                self.regs.i = code.nnn();
                2
            }
            Operation::JumpOffset => {
                let offset = if self.settings.jumping {
                    self.regs.v[x]
                } else {
                    self.regs.v[0]
                };
                self.regs.pc = code.nnn().wrapping_add(offset as u16);
                0
            }
            Operation::Random => {
                self.regs.v[x] = self.rng.gen::<u8>() & code.nn();
                2
            }
            Operation::Draw => self.draw_sprite(x, y, code.n()),
            Operation::SkipKeyPressed => skip_if(self.keypad.is_pressed(self.regs.v[x])),
            Operation::SkipKeyNotPressed => skip_if(!self.keypad.is_pressed(self.regs.v[x])),
            Operation::LoadDelay => {
                self.regs.v[x] = self.regs.delay_timer;
                2
            }
            Operation::WaitKey => match self.keypad.first_pressed() {
                Some(key) => {
                    self.regs.v[x] = key;
                    self.awaiting_key = false;
                    2
                }
                None => {
                    // busy-poll: PC stays put so the next cycle re-fetches
                    // this instruction
                    self.awaiting_key = true;
                    0
                }
            },
            Operation::SetDelayTimer => {
                self.regs.delay_timer = self.regs.v[x];
                2
            }
            Operation::SetSoundTimer => {
                self.regs.sound_timer = self.regs.v[x];
                2
            }
            Operation::AddIndex => {
                // no overflow flag on this form
                self.regs.i = self.regs.i.wrapping_add(self.regs.v[x] as u16);
                2
            }
            Operation::LoadGlyph => {
                let digit = (self.regs.v[x] & 0x0F) as u16;
                self.regs.i = FONT_ADDR + digit * GLYPH_SIZE;
                2
            }
            Operation::StoreBcd => {
                let vx = self.regs.v[x];
                self.memory.set_byte(self.regs.i, vx / 100);
                self.memory.set_byte(self.regs.i.wrapping_add(1), (vx / 10) % 10);
                self.memory.set_byte(self.regs.i.wrapping_add(2), vx % 10);
                2
            }
            Operation::StoreRegisters => {
                for idx in 0..=x {
                    self.memory
                        .set_byte(self.regs.i.wrapping_add(idx as u16), self.regs.v[idx]);
                }
                if self.settings.memory {
                    self.regs.i = self.regs.i.wrapping_add(x as u16 + 1);
                }
                2
            }
            Operation::LoadRegisters => {
                for idx in 0..=x {
                    self.regs.v[idx] = self.memory.get_byte(self.regs.i.wrapping_add(idx as u16));
                }
                if self.settings.memory {
                    self.regs.i = self.regs.i.wrapping_add(x as u16 + 1);
                }
                2
            }
        };
        Ok(advance)
    }

    /// XOR-blit an 8-wide, `height`-row sprite from memory at I. The base
    /// coordinates wrap modulo the display size; pixels past the right or
    /// bottom edge are clipped. VF reports whether any lit pixel was
    /// overdrawn.
    fn draw_sprite(&mut self, x: usize, y: usize, height: u8) -> u16 {
        let base_x = self.regs.v[x] as usize % DISPLAY_WIDTH;
        let base_y = self.regs.v[y] as usize % DISPLAY_HEIGHT;
        let mut collision = false;

        for row in 0..height as usize {
            let py = base_y + row;
            if py >= DISPLAY_HEIGHT {
                break;
            }
            let bits = self.memory.get_byte(self.regs.i.wrapping_add(row as u16));
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = base_x + col;
                if px >= DISPLAY_WIDTH {
                    continue;
                }
                collision |= self.framebuffer.flip(px, py);
            }
        }
        self.regs.v[0xF] = collision as u8;
        2
    }

    fn push_stack(&mut self, val: u16) -> Result<(), Chip8Error> {
        if self.regs.sp as usize >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow);
        }
        self.stack[self.regs.sp as usize] = val;
        self.regs.sp += 1;
        Ok(())
    }

    fn pop_stack(&mut self) -> Result<u16, Chip8Error> {
        if self.regs.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.regs.sp -= 1;
        Ok(self.stack[self.regs.sp as usize])
    }

    /// read-only framebuffer cells, for rendering
    pub fn display(&self) -> &[bool; DISPLAY_CELLS] {
        self.framebuffer.cells()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn press_key(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn release_key(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn release_all_keys(&mut self) {
        self.keypad.release_all();
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Chip8Interpreter::new()
    }
}

fn skip_if(cond: bool) -> u16 {
    if cond {
        4
    } else {
        2
    }
}

/// human-readable dump of the display and register file, for debugging and
/// test fixtures
impl fmt::Display for Chip8Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+{}+", "-".repeat(DISPLAY_WIDTH))?;
        for y in 0..DISPLAY_HEIGHT {
            write!(f, "|")?;
            for x in 0..DISPLAY_WIDTH {
                write!(f, "{}", if self.framebuffer.get(x, y) { '#' } else { ' ' })?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "+{}+", "-".repeat(DISPLAY_WIDTH))?;

        for (idx, val) in self.regs.v.iter().enumerate() {
            write!(f, " [V{:X}]: {:02x}", idx, val)?;
            if idx % 4 == 3 {
                writeln!(f)?;
            }
        }
        writeln!(f, " [I]: {:04x}", self.regs.i)?;
        writeln!(f, " [PC]: {:04x}", self.regs.pc)?;
        writeln!(f, " [SP]: {:04x}", self.regs.sp)?;
        writeln!(
            f,
            " [Timer delay]: {:02x}    [Timer sound]: {:02x}",
            self.regs.delay_timer, self.regs.sound_timer
        )
    }
}
