use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use chip8_core::constants::{DEFAULT_CLOCK_SPEED, MAX_SAVED_STATES};
use chip8_core::{Config, Quirks, TimerMode};

mod input;
mod keymap;
mod run;

const DEFAULT_SCALE: u32 = 10;
/// Fastest clock the CLI accepts
const MAX_CLOCK_SPEED: i64 = 100_000;
/// Deepest rewind history the CLI accepts; a saved state is about 4.5 KB
const MAX_REWIND_DEPTH: u64 = 36_000;

#[doc(hidden)]
#[derive(Parser, Debug)]
#[command(version, about = "Runs a Chip-8 ROM", long_about = None)]
struct Args {
    #[arg(help = "Path to the ROM file to run")]
    rom: PathBuf,

    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CLOCK_SPEED,
        value_parser = clap::value_parser!(u32).range(1..=MAX_CLOCK_SPEED),
        help = "Instructions per second"
    )]
    ips: u32,

    #[arg(long, help = "Stop on unknown opcodes instead of skipping them")]
    strict: bool,

    #[arg(long, help = "Use the original COSMAC VIP behaviour for shifts, loads and logic ops")]
    cosmac: bool,

    #[arg(long, help = "Make BNNN jump to XNN + VX instead of NNN + V0")]
    jump_vx: bool,

    #[arg(long, help = "Tick the timers on their own thread")]
    threaded_timers: bool,

    #[arg(
        long,
        default_value_t = MAX_SAVED_STATES,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_REWIND_DEPTH),
        help = "Number of past states kept for rewinding"
    )]
    rewind_depth: usize,

    #[arg(long, help = "Exit once the program jumps to itself")]
    exit_on_halt: bool,

    #[arg(long, help = "Seed for the random number generator")]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = DEFAULT_SCALE, help = "Size of a Chip-8 pixel in screen pixels")]
    scale: u32,
}

impl Args {
    fn config(&self) -> Config {
        let dialect = if self.cosmac {
            Quirks::cosmac_vip()
        } else {
            Quirks::chip48()
        };
        Config {
            instructions_per_second: self.ips,
            strict: self.strict,
            quirks: Quirks {
                jump_reads_vx: self.jump_vx,
                ..dialect
            },
            timer_mode: if self.threaded_timers {
                TimerMode::Threaded
            } else {
                TimerMode::Cooperative
            },
            rewind_depth: self.rewind_depth,
            exit_on_halt: self.exit_on_halt,
            seed: self.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    run::run(&args.rom, args.config(), args.scale)
}
