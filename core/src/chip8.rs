use std::collections::{HashSet, VecDeque};
use std::io::Read;

use log::{info, trace, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::constants::PROGRAM_START;
use crate::error::Result;
use crate::framebuffer::FrameBuffer;
use crate::frontend::Keypad;
use crate::instruction::Instruction;
use crate::operations::{self, Peripherals};
use crate::state::{KeyWait, State};
use crate::timer::Timers;

/// What a single call to `Chip8::step` did
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction ran to completion
    Executed(Instruction),
    /// The CPU is parked on `LD Vx, K` until a key is pressed and released
    AwaitingKey,
    /// The program jumped to itself; there's nothing left to run
    Halted,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - `keypad` with public interfaces for manipulating it
///  - the delay and sound `timers`, which tick independently of the CPU
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and reversing the CPU
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    keypad: Keypad,
    timers: Timers,
    rng: SmallRng,
    config: Config,
    rom: Vec<u8>,
    halted: bool,
    /// Addresses of unknown opcodes that have already been reported
    skipped_opcodes: HashSet<u16>,
}

impl Chip8 {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::new(),
            keypad: [false; 16],
            timers: Timers::new(),
            rng,
            config,
            rom: Vec::new(),
            halted: false,
            skipped_opcodes: HashSet::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load a rom at 0x200, resetting the machine first.
    ///
    /// The rom is kept around so that `reset` can reload it.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        let mut state = State::new();
        state.memory.load(rom, PROGRAM_START)?;
        self.rom = rom.to_vec();
        self.restart(state);
        info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom_from(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_rom(&rom)
    }

    /// Put the machine back the way it was right after the current rom was loaded
    pub fn reset(&mut self) -> Result<()> {
        let mut state = State::new();
        state.memory.load(&self.rom, PROGRAM_START)?;
        self.restart(state);
        info!("reset");
        Ok(())
    }

    fn restart(&mut self, state: State) {
        self.state = state;
        self.previous_states.clear();
        self.keypad = [false; 16];
        self.timers.reset();
        self.halted = false;
        self.skipped_opcodes.clear();
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Replace the state of every key at once
    pub fn set_keypad(&mut self, keypad: Keypad) {
        self.keypad = keypad;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad[(key & 0xF) as usize] = true;
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad[(key & 0xF) as usize] = false;
    }

    /// Advances the CPU by a single cycle
    /// - does nothing but watch the keypad while awaiting a keypress
    /// - otherwise fetches, decodes and executes the next opcode
    ///
    /// A failing instruction leaves the machine exactly as it was before the call.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(wait) = self.state.awaiting_key {
            self.watch_keypad(wait);
            return Ok(StepOutcome::AwaitingKey);
        }

        let pc = self.state.pc;
        let op = self.state.memory.read_word(pc)?;
        let instruction = Instruction::decode(op);
        trace!(
            "{:#05X} {} {:<18} v{:02X?} i{:#05X}",
            pc,
            op,
            instruction.to_string(),
            self.state.v,
            self.state.i
        );

        if instruction == (Instruction::Jp { addr: pc }) {
            if !self.halted {
                info!("program halted at {:#05X}", pc);
                self.halted = true;
            }
            return Ok(StepOutcome::Halted);
        }

        if let Instruction::Unknown(opcode) = instruction {
            if !self.config.strict && self.skipped_opcodes.insert(pc) {
                warn!("skipping unknown opcode {} at {:#05X}", opcode, pc);
            }
        }

        let mut io = Peripherals {
            keypad: &self.keypad,
            timers: &self.timers,
            rng: &mut self.rng,
            quirks: self.config.quirks,
            strict: self.config.strict,
        };
        let next = operations::execute(instruction, &self.state, &mut io)?;
        self.save_state();
        self.state = next;
        self.halted = false;
        Ok(StepOutcome::Executed(instruction))
    }

    /// `LD Vx, K` completes once a key goes down and comes back up
    fn watch_keypad(&mut self, wait: KeyWait) {
        match wait.pressed {
            None => {
                if let Some(key) = self.keypad.iter().position(|pressed| *pressed) {
                    self.state.awaiting_key = Some(KeyWait {
                        pressed: Some(key as u8),
                        ..wait
                    });
                }
            }
            Some(key) if !self.keypad[key as usize] => {
                self.state.v[wait.register as usize] = key;
                self.state.awaiting_key = None;
            }
            Some(_) => {}
        }
    }

    /// Reverses the CPU by a single cycle if possible
    /// - if there are previous_states, pops the last one and restores it
    pub fn rewind(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = State {
                    draw_flag: true,
                    ..state
                };
                self.halted = false;
                true
            }
            None => false,
        }
    }

    /// Number of states that can currently be rewound
    pub fn history_len(&self) -> usize {
        self.previous_states.len()
    }

    /// Puts the current state in previous_states
    /// - if there are already `rewind_depth` saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.config.rewind_depth == 0 {
            return;
        }
        if self.previous_states.len() == self.config.rewind_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
