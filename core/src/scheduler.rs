use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::chip8::{Chip8, StepOutcome};
use crate::config::TimerMode;
use crate::constants::{TIMER_HZ, TIMER_PERIOD};
use crate::error::{Chip8Error, Result};
use crate::frontend::{Audio, Control, Display, Input};
use crate::timer::TimerDriver;

/// How much faster emulated time passes while fast forwarding
const FAST_FORWARD_FACTOR: u32 = 4;

/// What happened during one call to `Scheduler::advance`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub steps: u64,
    pub ticks: u64,
    pub halted: bool,
}

/// # Scheduler
/// Drives a `Chip8` against the wall clock and wires it up to its frontend.
///
/// Instructions run at `instructions_per_second` and the timers tick at 60Hz. Both are
/// scheduled against emulated time so the timers stay locked to the wall clock no
/// matter how fast the CPU is running.
pub struct Scheduler<D, I, A> {
    chip8: Chip8,
    display: D,
    input: I,
    audio: A,
    cycle_time: Duration,
    elapsed: Duration,
    next_step_at: Duration,
    next_tick_at: Duration,
    tone: bool,
    timer_driver: Option<TimerDriver>,
}

impl<D: Display, I: Input, A: Audio> Scheduler<D, I, A> {
    pub fn new(chip8: Chip8, display: D, input: I, audio: A) -> Self {
        let ips = chip8.config().instructions_per_second.max(1);
        Scheduler {
            chip8,
            display,
            input,
            audio,
            // a zero cycle would never move emulated time forward
            cycle_time: (Duration::from_secs(1) / ips).max(Duration::from_nanos(1)),
            elapsed: Duration::ZERO,
            next_step_at: Duration::ZERO,
            next_tick_at: TIMER_PERIOD,
            tone: false,
            timer_driver: None,
        }
    }

    pub fn chip8(&self) -> &Chip8 {
        &self.chip8
    }

    pub fn chip8_mut(&mut self) -> &mut Chip8 {
        &mut self.chip8
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Emulated time that has passed so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn ticks_timers(&self) -> bool {
        self.chip8.config().timer_mode == TimerMode::Cooperative
    }

    /// Run everything that falls due in the next `elapsed` of emulated time.
    ///
    /// Steps and timer ticks happen in the order they fall due. A frame is presented
    /// after every instruction that changed the screen.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Progress> {
        let target = self.elapsed + elapsed;
        let ticks_timers = self.ticks_timers();
        let exit_on_halt = self.chip8.config().exit_on_halt;
        let mut progress = Progress::default();

        loop {
            let tick_due = ticks_timers && self.next_tick_at <= self.next_step_at;
            let due_at = if tick_due {
                self.next_tick_at
            } else {
                self.next_step_at
            };
            if due_at >= target {
                break;
            }

            if tick_due {
                self.chip8.timers().tick();
                self.next_tick_at += TIMER_PERIOD;
                progress.ticks += 1;
                self.update_tone()?;
                continue;
            }

            self.next_step_at += self.cycle_time;
            match self.chip8.step()? {
                StepOutcome::Executed(_) => {
                    progress.steps += 1;
                    self.update_tone()?;
                    if let Some(frame) = self.chip8.take_frame() {
                        self.display.present(&frame).map_err(Chip8Error::Frontend)?;
                    }
                }
                StepOutcome::AwaitingKey => {}
                StepOutcome::Halted => {
                    progress.halted = true;
                    if exit_on_halt {
                        break;
                    }
                }
            }
        }

        self.elapsed = target;
        self.update_tone()?;
        Ok(progress)
    }

    fn update_tone(&mut self) -> Result<()> {
        let tone = self.chip8.timers().tone();
        if tone != self.tone {
            self.audio.set_tone(tone).map_err(Chip8Error::Frontend)?;
            self.tone = tone;
        }
        Ok(())
    }

    /// Walk back one frame's worth of instructions
    fn rewind_frame(&mut self) -> Result<()> {
        let ips = self.chip8.config().instructions_per_second.max(1);
        let per_frame = (ips / TIMER_HZ).max(1);
        for _ in 0..per_frame {
            if !self.chip8.rewind() {
                break;
            }
        }
        if let Some(frame) = self.chip8.take_frame() {
            self.display.present(&frame).map_err(Chip8Error::Frontend)?;
        }
        Ok(())
    }

    /// Run frame by frame until the input asks to quit, the program halts with
    /// `exit_on_halt` set, or something fails.
    pub fn run(&mut self) -> Result<()> {
        let result = self.run_frames();
        self.timer_driver = None;
        let silenced = self.silence();
        match result {
            Err(e) => {
                error!("stopped: {}", e);
                Err(e)
            }
            Ok(()) => silenced,
        }
    }

    fn silence(&mut self) -> Result<()> {
        if self.tone {
            self.tone = false;
            self.audio.set_tone(false).map_err(Chip8Error::Frontend)?;
        }
        Ok(())
    }

    fn run_frames(&mut self) -> Result<()> {
        if self.chip8.config().timer_mode == TimerMode::Threaded {
            self.timer_driver = Some(TimerDriver::spawn(self.chip8.timers().clone())?);
        }
        self.present_current()?;

        let mut last_frame = Instant::now();
        loop {
            let keys = self.input.poll_keys().map_err(Chip8Error::Frontend)?;
            self.chip8.set_keypad(keys);

            let frame_start = Instant::now();
            let elapsed = frame_start - last_frame;
            last_frame = frame_start;

            let control = self.input.control();
            match control {
                Control::Quit => {
                    info!("quit requested");
                    return Ok(());
                }
                Control::Rewind => self.rewind_frame()?,
                Control::Run => {
                    if self.advance(elapsed)?.halted && self.chip8.config().exit_on_halt {
                        return Ok(());
                    }
                }
                Control::FastForward => {
                    let progress = self.advance(elapsed * FAST_FORWARD_FACTOR)?;
                    if progress.halted && self.chip8.config().exit_on_halt {
                        return Ok(());
                    }
                }
            }

            // Handle timing
            let deadline = frame_start + TIMER_PERIOD;
            let now = Instant::now();
            if now < deadline {
                thread::sleep(deadline - now);
            } else {
                debug!("frame overran by {:?}", now - deadline);
            }
        }
    }

    fn present_current(&mut self) -> Result<()> {
        let frame = *self.chip8.frame();
        self.display.present(&frame).map_err(Chip8Error::Frontend)
    }
}
