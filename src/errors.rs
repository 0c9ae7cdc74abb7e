use displaydoc::Display;
use std::error::Error;
use std::io;

/// Failure while loading a program image, before execution starts.
#[derive(Display, Debug)]
pub enum LoadError {
    /// could not read image file: {0}
    Io(io::Error),
    /// image file is shorter than the two-byte origin word
    MissingOrigin,
    /// image with origin {origin:#06X} and {words} payload words does not fit into memory
    DoesNotFit { origin: u16, words: usize },
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::MissingOrigin | Self::DoesNotFit { .. } => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Unrecoverable fault raised while executing instructions.
///
/// `address` is the address the faulting instruction was fetched from.
#[derive(Display, Debug)]
pub enum ExecutionError {
    /// illegal opcode {opcode:#06b} at address {address:#06X}
    IllegalInstruction { opcode: u8, address: u16 },
    /// unrecognized trap vector {vector:#04X} at address {address:#06X}
    UnknownTrapVector { vector: u8, address: u16 },
    /// console I/O failed: {0}
    Io(io::Error),
}

impl Error for ExecutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::IllegalInstruction { .. } | Self::UnknownTrapVector { .. } => None,
        }
    }
}

impl From<io::Error> for ExecutionError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
