use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use log::debug;

use crate::constants::TIMER_PERIOD;

/// # Timers
/// The delay and sound timers count down by one at 60Hz until they reach 0.
///
/// Both counters are atomics shared between the CPU, which loads and reads them, and
/// whatever drives the 60Hz tick, which may live on another thread. Clones share the
/// same counters.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    delay: Arc<AtomicU8>,
    sound: Arc<AtomicU8>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay.load(Ordering::Acquire)
    }

    pub fn sound(&self) -> u8 {
        self.sound.load(Ordering::Acquire)
    }

    pub fn set_delay(&self, value: u8) {
        self.delay.store(value, Ordering::Release);
    }

    pub fn set_sound(&self, value: u8) {
        self.sound.store(value, Ordering::Release);
    }

    /// The audio collaborator should sound a tone while this is true
    pub fn tone(&self) -> bool {
        self.sound() > 0
    }

    /// Counts both timers down by one, stopping at 0
    pub fn tick(&self) {
        Self::count_down(&self.delay);
        Self::count_down(&self.sound);
    }

    pub fn reset(&self) {
        self.set_delay(0);
        self.set_sound(0);
    }

    fn count_down(timer: &AtomicU8) {
        // an Err only means the timer was already at 0
        let _ = timer.fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1));
    }
}

/// # Timer driver
/// Ticks a set of `Timers` at 60Hz on a dedicated thread.
///
/// Ticks are scheduled against absolute deadlines so sleep overshoot doesn't accumulate
/// into drift. The thread stops and is joined when the driver is dropped.
pub struct TimerDriver {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl TimerDriver {
    pub fn spawn(timers: Timers) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("chip8-timers".into())
            .spawn(move || {
                debug!("timer thread started");
                let mut deadline = Instant::now() + TIMER_PERIOD;
                while flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < deadline {
                        thread::sleep(deadline - now);
                    }
                    timers.tick();
                    deadline += TIMER_PERIOD;
                }
                debug!("timer thread stopped");
            })?;

        Ok(TimerDriver {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
