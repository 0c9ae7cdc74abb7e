//! The fetch-decode-execute engine driving the LC-3 machine.
pub mod instruction;
pub mod opcodes;
pub mod trap_routines;

#[cfg(test)]
pub(crate) mod test_helpers;

use crate::emulator::instruction::{Instruction, Opcode};
use crate::errors::{ExecutionError, LoadError};
use crate::hardware::console::Console;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::fs;
use std::path::Path;

/// Outcome of executing a single instruction.
///
/// Faults (illegal opcode, unrecognized trap vector, console failure)
/// are the `Err` arm of [`Emulator::step`], not a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

/// Why [`Emulator::run`] returned without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The program executed TRAP HALT.
    Halted,
    /// The console reported an external interrupt (CTRL-C).
    Interrupted,
}

/// One LC-3 machine instance: memory, register file and console.
///
/// All state is owned by the instance, so independent machines and
/// unit tests coexist without shared globals.
pub struct Emulator<C: Console> {
    memory: Memory,
    registers: Registers,
    console: C,
}

impl<C: Console> Emulator<C> {
    /// Fresh machine: zero-filled memory, PC at 0x3000, Zero flag set.
    pub fn new(console: C) -> Self {
        Self {
            memory: Memory::new(),
            registers: Registers::new(),
            console,
        }
    }

    /// Loads a big-endian image file: the first word is the origin
    /// address, the remaining words are copied there consecutively.
    /// A trailing odd byte is ignored, only whole words are loaded.
    ///
    /// # Errors
    /// - file missing or unreadable
    /// - file shorter than the origin word
    /// - image runs past the end of memory
    pub fn load_image_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let bytes = fs::read(path)?;
        let mut words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        let origin = words.next().ok_or(LoadError::MissingOrigin)?;
        let payload: Vec<u16> = words.collect();
        self.load_image(origin, &payload)
    }

    /// Copies an already byte-swapped image into memory at `origin`.
    ///
    /// # Errors
    /// - image runs past the end of memory
    pub fn load_image(&mut self, origin: u16, words: &[u16]) -> Result<(), LoadError> {
        self.memory.load_image(origin, words)
    }

    /// Fetches, decodes and executes exactly one instruction.
    ///
    /// The PC is incremented directly after the fetch, so offsets
    /// resolved during execution are relative to the next instruction.
    ///
    /// # Errors
    /// - [`ExecutionError::IllegalInstruction`] for RES or RTI
    /// - [`ExecutionError::UnknownTrapVector`]
    /// - [`ExecutionError::Io`] when the console fails
    pub fn step(&mut self) -> Result<StepOutcome, ExecutionError> {
        let address = self.registers.pc();
        let word = self.memory.read(address, &mut self.console)?;
        self.registers.set_pc(address.wrapping_add(1));
        let i = Instruction::from(word);
        let r = &mut self.registers;
        match i.opcode() {
            Opcode::Add => opcodes::add(i, r),
            Opcode::And => opcodes::and(i, r),
            Opcode::Not => opcodes::not(i, r),
            Opcode::Br => opcodes::br(i, r),
            Opcode::Jmp => opcodes::jmp(i, r),
            Opcode::Jsr => opcodes::jsr(i, r),
            Opcode::Ld => opcodes::ld(i, r, &mut self.memory, &mut self.console)?,
            Opcode::Ldi => opcodes::ldi(i, r, &mut self.memory, &mut self.console)?,
            Opcode::Ldr => opcodes::ldr(i, r, &mut self.memory, &mut self.console)?,
            Opcode::Lea => opcodes::lea(i, r),
            Opcode::St => opcodes::st(i, r, &mut self.memory),
            Opcode::Sti => opcodes::sti(i, r, &mut self.memory, &mut self.console)?,
            Opcode::Str => opcodes::str(i, r, &mut self.memory),
            Opcode::Trap => {
                return trap_routines::dispatch(
                    i,
                    address,
                    r,
                    &mut self.memory,
                    &mut self.console,
                );
            }
            Opcode::Res | Opcode::Rti => {
                return Err(ExecutionError::IllegalInstruction {
                    opcode: i.op_code(),
                    address,
                });
            }
        }
        Ok(StepOutcome::Continue)
    }

    /// Steps until the program halts, a fault occurs or the console
    /// reports an external interrupt.
    ///
    /// # Errors
    /// - any fault from [`Emulator::step`]; the machine stops at the
    ///   faulting instruction
    pub fn run(&mut self) -> Result<RunExit, ExecutionError> {
        loop {
            if let StepOutcome::Halted = self.step()? {
                return Ok(RunExit::Halted);
            }
            if self.console.is_interrupted() {
                return Ok(RunExit::Interrupted);
            }
        }
    }

    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }
    #[must_use]
    pub const fn console(&self) -> &C {
        &self.console
    }
}
