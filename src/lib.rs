//! # LC-3 virtual machine.
//!
//! `lc3-vm` emulates the LC-3: 64K words of memory with a
//! memory-mapped keyboard, eight general purpose registers, condition
//! flags and the full 16-opcode instruction set with trap-based
//! system calls. Usage starts with loading a program image via
//! [`emulator::Emulator::load_image_file`] or
//! [`emulator::Emulator::load_image`], then driving the machine with
//! [`emulator::Emulator::run`] or single [`emulator::Emulator::step`]s.
//!
//! # Example
//! ```
//! use lc3_vm::emulator::{Emulator, RunExit};
//! use lc3_vm::hardware::console::TerminalConsole;
//!
//! let mut emu = Emulator::new(TerminalConsole::new());
//! // AND R0,R0,#0 / ADD R0,R0,#5 / TRAP x25
//! emu.load_image(0x3000, &[0x5020, 0x1025, 0xF025]).unwrap();
//! assert_eq!(emu.run().unwrap(), RunExit::Halted);
//! assert_eq!(emu.registers().get(0), 5);
//! ```
//! # Errors
//! - Image file missing or unreadable, or shorter than the origin word
//! - Image running past the end of memory
//! - RES/RTI opcodes and unrecognized trap vectors are fatal faults

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod terminal;
