use crate::constants::{DEFAULT_CLOCK_SPEED, MAX_SAVED_STATES};

/// # Quirks
/// Chip-8 interpreters disagree on a handful of instructions. The defaults follow
/// CHIP-48 / SUPER-CHIP, which is what most ROMs in circulation were written against.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy6/8xyE shift Vy into Vx instead of shifting Vx in place
    pub shift_reads_vy: bool,
    /// Fx55/Fx65 leave I pointing past the last register copied
    pub load_store_increments_i: bool,
    /// 8xy1/8xy2/8xy3 reset VF to 0
    pub logic_resets_vf: bool,
    /// Bxnn jumps to xnn + Vx rather than nnn + V0. Off in both presets; only some
    /// SUPER-CHIP ROMs expect it, so it's switched on separately.
    pub jump_reads_vx: bool,
}

impl Quirks {
    /// CHIP-48 / SUPER-CHIP behaviour
    pub const fn chip48() -> Self {
        Quirks {
            shift_reads_vy: false,
            load_store_increments_i: false,
            logic_resets_vf: false,
            jump_reads_vx: false,
        }
    }

    /// Behaviour of the original interpreter on the COSMAC VIP
    pub const fn cosmac_vip() -> Self {
        Quirks {
            shift_reads_vy: true,
            load_store_increments_i: true,
            logic_resets_vf: true,
            jump_reads_vx: false,
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::chip48()
    }
}

/// Where the 60Hz timer ticks come from
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TimerMode {
    /// The scheduler ticks the timers itself from the wall-clock time it's given
    #[default]
    Cooperative,
    /// A dedicated thread ticks the timers
    Threaded,
}

/// # Config
/// Everything about how a Chip-8 runs that isn't part of the ROM.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Instructions executed per second of wall-clock time
    pub instructions_per_second: u32,
    /// Treat unknown opcodes as fatal instead of skipping them
    pub strict: bool,
    pub quirks: Quirks,
    pub timer_mode: TimerMode,
    /// How many past states are kept for rewinding; 0 disables rewinding
    pub rewind_depth: usize,
    /// Stop the run loop once the program jumps to itself
    pub exit_on_halt: bool,
    /// Seed for the RND instruction; seeded from the OS when `None`
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_second: DEFAULT_CLOCK_SPEED,
            strict: false,
            quirks: Quirks::default(),
            timer_mode: TimerMode::default(),
            rewind_depth: MAX_SAVED_STATES,
            exit_on_halt: false,
            seed: None,
        }
    }
}
