pub use display::SdlDisplay;

mod display;
