use crate::constants::{FONT_ADDR, MEMORY_SIZE, SPRITE_SHEET};
use crate::error::{Chip8Error, Result};
use crate::opcode::Opcode;

/// # Memory
/// 4096 bytes of flat addressable RAM.
///
/// ```text
/// 0x000 - 0x1FF  reserved for the interpreter; the font lives at 0x050
/// 0x200 - 0xFFF  program and data
/// ```
///
/// Every access is bounds checked; nothing outside `0x000..=0xFFF` can be read or written.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the font baked into the interpreter region
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_ADDR as usize;
        bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Copies `rom` into memory starting at `origin`.
    ///
    /// Fails without writing anything if the ROM would run past the end of memory.
    pub fn load(&mut self, rom: &[u8], origin: u16) -> Result<()> {
        let start = origin as usize;
        if start + rom.len() > MEMORY_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                origin,
                capacity: MEMORY_SIZE.saturating_sub(start),
            });
        }
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Chip8Error::OutOfBounds {
                address: addr as usize,
            })
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        let cell = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Chip8Error::OutOfBounds {
                address: addr as usize,
            })?;
        *cell = value;
        Ok(())
    }

    /// Reads the big-endian opcode at `addr..=addr + 1`
    pub fn read_word(&self, addr: u16) -> Result<Opcode> {
        let bytes = self.slice(addr, 2)?;
        Ok(Opcode::from_bytes(bytes[0], bytes[1]))
    }

    /// Borrows `len` bytes starting at `addr`
    pub fn slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let range = Self::range(addr, len)?;
        Ok(&self.bytes[range])
    }

    /// Overwrites memory starting at `addr` with `data`
    pub fn write_slice(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        let range = Self::range(addr, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// The address range `addr..addr + len`, or the first address that falls outside memory
    fn range(addr: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::OutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
