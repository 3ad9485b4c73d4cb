use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # FrameBuffer
/// The Chip-8 display is composed of 64x32 black/white pixels.
///
/// Each row is packed into a `u64` with the leftmost pixel in the most significant bit,
/// so XOR-ing a sprite row is a single rotate and xor, and wrapping around the right
/// edge falls out of the rotate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    rows: [u64; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub const WIDTH: usize = DISPLAY_WIDTH;
    pub const HEIGHT: usize = DISPLAY_HEIGHT;

    pub const fn new() -> Self {
        FrameBuffer {
            rows: [0; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.rows = [0; DISPLAY_HEIGHT];
    }

    /// Whether the pixel at (x, y) is lit; coordinates wrap around the edges
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let row = self.rows[y % DISPLAY_HEIGHT];
        (row >> (DISPLAY_WIDTH - 1 - x % DISPLAY_WIDTH)) & 1 == 1
    }

    /// Lights or clears a single pixel
    pub fn set_pixel(&mut self, x: usize, y: usize, lit: bool) {
        let mask = 1u64 << (DISPLAY_WIDTH - 1 - x % DISPLAY_WIDTH);
        let row = &mut self.rows[y % DISPLAY_HEIGHT];
        if lit {
            *row |= mask;
        } else {
            *row &= !mask;
        }
    }

    /// XORs one 8-pixel sprite row onto the screen with its leftmost pixel at (x, y).
    /// Returns true if any lit pixel was erased.
    pub fn xor_sprite_row(&mut self, x: usize, y: usize, sprite_row: u8) -> bool {
        let sprite =
            (u64::from(sprite_row) << (DISPLAY_WIDTH - 8)).rotate_right((x % DISPLAY_WIDTH) as u32);
        let row = &mut self.rows[y % DISPLAY_HEIGHT];
        let collision = *row & sprite != 0;
        *row ^= sprite;
        collision
    }

    /// Rows of packed pixels, top to bottom
    pub fn rows(&self) -> &[u64; DISPLAY_HEIGHT] {
        &self.rows
    }

    /// Every pixel in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        self.rows
            .iter()
            .flat_map(|row| (0..DISPLAY_WIDTH).rev().map(move |bit| (row >> bit) & 1 == 1))
    }

    pub fn lit_pixels(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
