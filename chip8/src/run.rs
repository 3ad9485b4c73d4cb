use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context};
use log::info;

use chip8_core::{Chip8, Config, Scheduler, SilentAudio};
use chip8_display::SdlDisplay;

use crate::input::SdlInput;

pub fn run(rom: &Path, config: Config, scale: u32) -> anyhow::Result<()> {
    let mut chip8 = Chip8::new(config);

    // Load ROM
    let file = File::open(rom).with_context(|| format!("unable to open {}", rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom_from(&mut reader)
        .with_context(|| format!("unable to load {}", rom.display()))?;

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let display = SdlDisplay::new(&sdl, scale).map_err(|e| anyhow!(e))?;
    let events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    info!(
        "running {} at {} instructions per second",
        rom.display(),
        config.instructions_per_second
    );
    let mut scheduler = Scheduler::new(chip8, display, SdlInput::new(events), SilentAudio::new());
    scheduler.run()?;
    Ok(())
}
