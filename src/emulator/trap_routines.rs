//! Built-in service routines for the six LC-3 trap vectors.
//!
//! Trap codes execute built-in behavior directly; there is no
//! vector-table indirection and user-supplied handlers are not
//! supported.
use crate::emulator::StepOutcome;
use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::console::Console;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::io;

/// Recognized trap vectors; any other vector is a fatal fault.
#[repr(u8)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapVector {
    /// Read one character without echo.
    GetC = 0x20,
    /// Write the character in R0 low byte.
    Out = 0x21,
    /// Write a word-per-character string.
    PutS = 0x22,
    /// Prompt, read one character with echo.
    In = 0x23,
    /// Write a two-characters-per-word string.
    PutSp = 0x24,
    /// Stop the machine.
    Halt = 0x25,
}

/// Resolves the trap vector of `i` and runs the matching routine.
///
/// The post-fetch PC is saved in R7 first, as a hardware TRAP would
/// do before jumping through the vector table.
///
/// # Errors
/// - [`ExecutionError::UnknownTrapVector`] for an unrecognized vector;
///   `address` is where the TRAP instruction was fetched from
/// - console I/O failure
pub fn dispatch<C: Console>(
    i: Instruction,
    address: u16,
    regs: &mut Registers,
    mem: &mut Memory,
    console: &mut C,
) -> Result<StepOutcome, ExecutionError> {
    let vector = i.trap_vector();
    let trap = TrapVector::n(vector).ok_or(ExecutionError::UnknownTrapVector { vector, address })?;
    regs.set(7, regs.pc());
    match trap {
        TrapVector::GetC => get_c(regs, console),
        TrapVector::Out => out(regs, console),
        TrapVector::PutS => put_s(regs, mem, console),
        TrapVector::In => in_trap(regs, console),
        TrapVector::PutSp => put_sp(regs, mem, console),
        TrapVector::Halt => halt(console),
    }
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
fn get_c<C: Console>(
    regs: &mut Registers,
    console: &mut C,
) -> Result<StepOutcome, ExecutionError> {
    let c = console.read_char()?;
    if console.is_interrupted() {
        // an interrupt arrived instead of a character, leave R0 alone
        return Ok(StepOutcome::Continue);
    }
    regs.set(0, u16::from(c));
    Ok(StepOutcome::Continue)
}

/// OUT: Write a character in R0[7:0] to the console display.
fn out<C: Console>(regs: &Registers, console: &mut C) -> Result<StepOutcome, ExecutionError> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation to the low byte is what is expected here"
    )]
    console.write_char(regs.get(0) as u8)?;
    Ok(StepOutcome::Continue)
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC.
fn in_trap<C: Console>(
    regs: &mut Registers,
    console: &mut C,
) -> Result<StepOutcome, ExecutionError> {
    console.write_str("Enter a character: ")?;
    let c = console.read_char()?;
    if console.is_interrupted() {
        // an interrupt arrived instead of a character, no echo
        return Ok(StepOutcome::Continue);
    }
    console.write_char(c)?;
    regs.set(0, u16::from(c));
    Ok(StepOutcome::Continue)
}

fn write_one_char_per_u16<C: Console>(input: u16, console: &mut C) -> io::Result<()> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation is what is expected here"
    )]
    console.write_char(input as u8)
}

fn write_two_chars_per_u16<C: Console>(input: u16, console: &mut C) -> io::Result<()> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation is what is expected here"
    )]
    console.write_char(input as u8)?;
    let high = (input >> 8) as u8;
    if high != 0 {
        console.write_char(high)?;
    }
    Ok(())
}

/// Walks memory from the address in R0 until a zero word, writing each
/// word's characters through `write_chars` as it is read, so output
/// produced before a mid-string failure is not lost.
fn put<C: Console>(
    regs: &Registers,
    mem: &mut Memory,
    console: &mut C,
    write_chars: fn(u16, &mut C) -> io::Result<()>,
) -> Result<StepOutcome, ExecutionError> {
    let mut address = regs.get(0);
    loop {
        let word = mem.read(address, console)?;
        if word == 0 {
            break;
        }
        write_chars(word, console)?;
        address = address.wrapping_add(1);
    }
    Ok(StepOutcome::Continue)
}

/// PUTS: print the zero-terminated string at R0's address, one character per word.
fn put_s<C: Console>(
    regs: &Registers,
    mem: &mut Memory,
    console: &mut C,
) -> Result<StepOutcome, ExecutionError> {
    put(regs, mem, console, write_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits [7:0] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x0000 word.
fn put_sp<C: Console>(
    regs: &Registers,
    mem: &mut Memory,
    console: &mut C,
) -> Result<StepOutcome, ExecutionError> {
    put(regs, mem, console, write_two_chars_per_u16)
}

/// HALT: End program and print a notice.
fn halt<C: Console>(console: &mut C) -> Result<StepOutcome, ExecutionError> {
    console.write_str("\nProgram halted\n")?;
    Ok(StepOutcome::Halted)
}
