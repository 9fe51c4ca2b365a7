use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can stop the machine. Unknown opcodes are not in here,
/// they're skipped over as no-ops.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("instruction fetch out of bounds at pc {pc:#06X}")]
    FetchOutOfBounds { pc: u16 },

    #[error("memory access of {len} bytes out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize, len: usize },

    #[error("stack overflow: call at pc {pc:#06X} with a full call stack")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at pc {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("failed to read ROM: {0}")]
    Io(#[from] std::io::Error),
}
