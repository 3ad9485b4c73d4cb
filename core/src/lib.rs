pub use chip8::{Chip8, StepOutcome};
pub use config::{Config, Quirks, TimerMode};
pub use error::{Chip8Error, FrontendError, Result, StackFault};
pub use framebuffer::FrameBuffer;
pub use frontend::{
    Audio, Control, Display, Input, Keypad, NullDisplay, ScriptedInput, SilentAudio,
};
pub use instruction::Instruction;
pub use memory::Memory;
pub use opcode::Opcode;
pub use scheduler::{Progress, Scheduler};
pub use stack::Stack;
pub use state::{KeyWait, State};
pub use timer::{TimerDriver, Timers};

mod chip8;
pub mod config;
pub mod constants;
mod error;
pub mod framebuffer;
pub mod frontend;
mod instruction;
mod memory;
mod opcode;
mod operations;
mod scheduler;
mod stack;
pub mod state;
mod timer;
