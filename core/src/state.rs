use crate::constants::PROGRAM_START;
use crate::framebuffer::FrameBuffer;
use crate::memory::Memory;
use crate::stack::Stack;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// ## Memory
/// - a 16 deep call stack of return addresses
/// - 4096 bytes of addressable memory
/// - 64x32 bit frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Input
/// - emulation halts while `awaiting_key` is set, until a key is pressed and released
///
/// The delay and sound timers aren't part of the snapshot; they tick on their own clock
/// and live in `Timers`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub awaiting_key: Option<KeyWait>,
}

/// Progress of an `LD Vx, K` instruction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyWait {
    /// Register that receives the key
    pub register: u8,
    /// The key seen going down, if any; it's captured once it's released
    pub pressed: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: Stack::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            awaiting_key: None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
