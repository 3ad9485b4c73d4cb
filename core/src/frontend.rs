//! The surfaces the interpreter talks to without knowing what's behind them.
//!
//! A frontend supplies a `Display` to show frames, an `Input` to read the keypad from
//! and an `Audio` to beep. Headless versions of each live here too, for tests and for
//! running ROMs without a window.

use std::collections::VecDeque;

use log::debug;

use crate::error::FrontendError;
use crate::framebuffer::FrameBuffer;

/// Pressed state of keys 0..F
pub type Keypad = [bool; 16];

pub type FrontendResult = Result<(), FrontendError>;

/// Shows frames. Called with the whole frame buffer after every CLS or DRW.
pub trait Display {
    fn present(&mut self, frame: &FrameBuffer) -> FrontendResult;
}

/// What the user wants the run loop to do, besides pressing keypad keys
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Run,
    /// Run several times faster than real time
    FastForward,
    /// Step backwards through saved states instead of forwards
    Rewind,
    Quit,
}

/// Reads the keypad. Polled once per frame.
pub trait Input {
    fn poll_keys(&mut self) -> Result<Keypad, FrontendError>;

    /// The most recently requested control, as of the last `poll_keys`
    fn control(&self) -> Control {
        Control::Run
    }
}

/// Makes a tone while the sound timer is running
pub trait Audio {
    fn set_tone(&mut self, on: bool) -> FrontendResult;
}

/// Discards frames, remembering only the latest
#[derive(Debug, Default)]
pub struct NullDisplay {
    pub frames_presented: usize,
    pub last_frame: Option<FrameBuffer>,
}

impl NullDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for NullDisplay {
    fn present(&mut self, frame: &FrameBuffer) -> FrontendResult {
        self.frames_presented += 1;
        self.last_frame = Some(*frame);
        Ok(())
    }
}

/// Replays a fixed sequence of keypad states, one per poll, then holds the last one.
/// Asks the run loop to quit once `quit_after` polls have been made.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<Keypad>,
    current: Keypad,
    polls: usize,
    quit_after: Option<usize>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Keypad>) -> Self {
        ScriptedInput {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn quit_after(mut self, polls: usize) -> Self {
        self.quit_after = Some(polls);
        self
    }
}

impl Input for ScriptedInput {
    fn poll_keys(&mut self) -> Result<Keypad, FrontendError> {
        self.polls += 1;
        if let Some(keys) = self.script.pop_front() {
            self.current = keys;
        }
        Ok(self.current)
    }

    fn control(&self) -> Control {
        match self.quit_after {
            Some(limit) if self.polls >= limit => Control::Quit,
            _ => Control::Run,
        }
    }
}

/// Keeps track of whether a tone should be playing without making a sound
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub tone: bool,
    pub transitions: usize,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Audio for SilentAudio {
    fn set_tone(&mut self, on: bool) -> FrontendResult {
        if on != self.tone {
            debug!("tone {}", if on { "on" } else { "off" });
            self.transitions += 1;
        }
        self.tone = on;
        Ok(())
    }
}
