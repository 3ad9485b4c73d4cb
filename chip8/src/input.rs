use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use chip8_core::{Control, FrontendError, Input, Keypad};

use crate::keymap::keymap;

/// Keypad state over one frame's worth of events.
///
/// A key that goes down and comes back up within a single frame still reads as pressed
/// for that frame, so short taps reach `SKP` and `LD Vx, K`.
#[derive(Debug, Default)]
struct KeyLatch {
    held: Keypad,
    tapped: Keypad,
}

impl KeyLatch {
    fn press(&mut self, key: u8) {
        self.held[key as usize] = true;
        self.tapped[key as usize] = true;
    }

    fn release(&mut self, key: u8) {
        self.held[key as usize] = false;
    }

    /// The keys to report for the frame that just ended
    fn take(&mut self) -> Keypad {
        let mut keys = self.held;
        for (key, tapped) in keys.iter_mut().zip(self.tapped) {
            *key |= tapped;
        }
        self.tapped = [false; 16];
        keys
    }
}

/// Reads the keypad from the keyboard.
///
/// Besides the 16 keypad keys, space fast forwards while held, backspace rewinds while
/// held and escape or closing the window quits.
pub struct SdlInput {
    events: EventPump,
    keys: KeyLatch,
    fast_forward: bool,
    rewind: bool,
    quit: bool,
}

impl SdlInput {
    pub fn new(events: EventPump) -> Self {
        SdlInput {
            events,
            keys: KeyLatch::default(),
            fast_forward: false,
            rewind: false,
            quit: false,
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Quit { .. } => self.quit = true,
            Event::KeyDown {
                keycode: Some(key), ..
            } => match (key, keymap(key)) {
                (_, Some(kc)) => self.keys.press(kc),
                (Keycode::Space, _) => self.fast_forward = true,
                (Keycode::Backspace, _) => self.rewind = true,
                (Keycode::Escape, _) => self.quit = true,
                _ => {}
            },
            Event::KeyUp {
                keycode: Some(key), ..
            } => match (key, keymap(key)) {
                (_, Some(kc)) => self.keys.release(kc),
                (Keycode::Space, _) => self.fast_forward = false,
                (Keycode::Backspace, _) => self.rewind = false,
                _ => {}
            },
            _ => {}
        }
    }
}

impl Input for SdlInput {
    fn poll_keys(&mut self) -> Result<Keypad, FrontendError> {
        let events: Vec<Event> = self.events.poll_iter().collect();
        for event in events {
            self.handle(event);
        }
        Ok(self.keys.take())
    }

    fn control(&self) -> Control {
        if self.quit {
            Control::Quit
        } else if self.rewind {
            Control::Rewind
        } else if self.fast_forward {
            Control::FastForward
        } else {
            Control::Run
        }
    }
}
