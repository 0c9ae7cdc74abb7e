use crate::errors::LoadError;
use crate::hardware::console::Console;
use std::io;

/// Number of addressable 16-bit cells.
pub const MEMORY_WORDS: usize = 1 << 16;

/// Memory regions mapped to IO functionality.
#[repr(u16)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMappedRegister {
    /// Keyboard Status Register, bit 15 signals a pending character.
    Kbsr = 0xFE00,
    /// Keyboard Data Register, low byte holds the pending character.
    Kbdr = 0xFE02,
}

/// The full 64K word-addressable LC-3 memory.
///
/// Reads of the keyboard status register are intercepted to reflect
/// live console input; everything else is plain array access.
pub struct Memory {
    /// Index equals memory address
    data: Vec<u16>,
}

impl Memory {
    const KBSR_READY: u16 = 1 << 15;

    #[must_use]
    pub fn new() -> Self {
        Self {
            data: vec![0x0u16; MEMORY_WORDS],
        }
    }

    /// Reads the cell at `address`.
    ///
    /// A read of [`MemoryMappedRegister::Kbsr`] polls the console: if a
    /// character is pending, the status register is set to ready and
    /// the character is staged in [`MemoryMappedRegister::Kbdr`] for a
    /// subsequent read, otherwise the status register reads as zero.
    ///
    /// # Errors
    /// - console polling failed
    pub fn read(&mut self, address: u16, console: &mut impl Console) -> io::Result<u16> {
        match MemoryMappedRegister::n(address) {
            Some(MemoryMappedRegister::Kbsr) => {
                if console.poll_ready()? {
                    // poll_ready staged the character, this cannot block
                    self.set_mapped(MemoryMappedRegister::Kbsr, Self::KBSR_READY);
                    self.set_mapped(MemoryMappedRegister::Kbdr, u16::from(console.read_char()?));
                } else {
                    self.set_mapped(MemoryMappedRegister::Kbsr, 0);
                }
            }
            Some(MemoryMappedRegister::Kbdr) | None => {}
        }
        Ok(self.data[usize::from(address)])
    }

    /// Stores `value` at `address` unconditionally; the memory-mapped
    /// addresses are writable like any other cell.
    pub fn write(&mut self, address: u16, value: u16) {
        self.data[usize::from(address)] = value;
    }

    fn set_mapped(&mut self, register: MemoryMappedRegister, value: u16) {
        self.data[usize::from(register as u16)] = value;
    }

    /// Copies `words` into memory starting at `origin`.
    ///
    /// # Errors
    /// - the image would run past the end of memory
    pub fn load_image(&mut self, origin: u16, words: &[u16]) -> Result<(), LoadError> {
        let start = usize::from(origin);
        let end = start
            .checked_add(words.len())
            .filter(|end| *end <= MEMORY_WORDS)
            .ok_or(LoadError::DoesNotFit {
                origin,
                words: words.len(),
            })?;
        self.data[start..end].copy_from_slice(words);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
