use std::time::Duration;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;
/// Where ROMs are loaded and execution starts
pub const PROGRAM_START: u16 = 0x200;
/// Where the hexadecimal font is baked into the reserved interpreter region
pub const FONT_ADDR: u16 = 0x050;
/// Height in bytes of a single font glyph
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum number of nested subroutine calls
pub const STACK_DEPTH: usize = 16;

/// Opcodes are two bytes wide
pub const OPCODE_SIZE: u16 = 2;

/// Instructions executed per second unless configured otherwise
pub const DEFAULT_CLOCK_SPEED: u32 = 700;
/// Rate at which the delay and sound timers count down
pub const TIMER_HZ: u32 = 60;
/// Wall-clock time between two timer ticks
pub const TIMER_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / TIMER_HZ as u64);
/// Number of past states kept around for rewinding unless configured otherwise
pub const MAX_SAVED_STATES: usize = 600;

/// # Sprite sheet
/// Glyphs for the hexadecimal digits 0..F, each 4 pixels wide and 5 tall.
///
/// ```text
/// 0xF0  ####
/// 0x90  #  #
/// 0x90  #  #
/// 0x90  #  #
/// 0xF0  ####
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
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
