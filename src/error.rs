use std::error::Error;
use std::fmt;
use std::io;

/// Everything that can go wrong while loading or running a program.
///
/// Loads are recoverable (state is untouched, the caller may retry with a
/// different rom); decode and stack faults are fatal and execution must
/// stop.
#[derive(Debug)]
pub enum Chip8Error {
    /// rom exceeds the program region; holds the offending length
    RomTooLarge(usize),
    /// instruction word matches no table entry; holds the fetched word
    UnknownOpcode(u16),
    /// call with all 16 stack slots in use
    StackOverflow,
    /// return with an empty stack
    StackUnderflow,
    /// rom file unreadable
    Io(io::Error),
}

impl fmt::Display for Chip8Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chip8Error::RomTooLarge(len) => {
                write!(f, "rom size too large ({} bytes)", len)
            }
            Chip8Error::UnknownOpcode(word) => {
                write!(f, "unknown opcode 0x{:04x}", word)
            }
            Chip8Error::StackOverflow => write!(f, "call stack overflow"),
            Chip8Error::StackUnderflow => write!(f, "call stack underflow"),
            Chip8Error::Io(e) => write!(f, "rom read failed: {}", e),
        }
    }
}

impl Error for Chip8Error {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Chip8Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Chip8Error {
    fn from(e: io::Error) -> Self {
        Chip8Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Chip8Error::UnknownOpcode(0x8ab8).to_string(),
            "unknown opcode 0x8ab8"
        );
        assert_eq!(
            Chip8Error::RomTooLarge(4000).to_string(),
            "rom size too large (4000 bytes)"
        );
    }

    #[test]
    fn test_io_source_preserved() {
        let e: Chip8Error = io::Error::new(io::ErrorKind::NotFound, "nope").into();
        assert!(e.source().is_some());
    }
}
