use std::fmt;

use thiserror::Error;

use crate::constants::STACK_DEPTH;
use crate::opcode::Opcode;

/// Errors reported by the frontend collaborators (display, input, audio)
pub type FrontendError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can stop a Chip-8 from running.
///
/// All of these are fatal to the run loop; `UnknownOpcode` is only ever raised in
/// strict mode, otherwise unknown opcodes are skipped with a warning.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("ROM is too large ({size} bytes at {origin:#05X}), at most {capacity} bytes fit")]
    RomTooLarge {
        size: usize,
        origin: u16,
        capacity: usize,
    },

    #[error("stack {fault} at address {address:#05X}")]
    StackFault { fault: StackFault, address: u16 },

    #[error("unknown opcode {opcode} at address {address:#05X}")]
    UnknownOpcode { opcode: Opcode, address: u16 },

    #[error("I/O failure")]
    Io(#[from] std::io::Error),

    #[error("frontend failure: {0}")]
    Frontend(#[source] FrontendError),
}

/// Which way the call stack was misused
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StackFault {
    /// CALL with all stack slots in use
    Overflow,
    /// RET with no return address on the stack
    Underflow,
}

impl fmt::Display for StackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackFault::Overflow => write!(f, "overflow (more than {} nested calls)", STACK_DEPTH),
            StackFault::Underflow => write!(f, "underflow (return outside of a subroutine)"),
        }
    }
}
