//! Operand semantics for the LC-3 instruction set.
//!
//! One function per executable opcode. All additions are 16-bit
//! wraparound; overflow is defined behavior, never a fault.
use crate::emulator::instruction::Instruction;
use crate::hardware::console::Console;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{ConditionFlag, Registers};
use std::io;

/// ADD: Mathematical addition in 2 variants
/// - DR is set with result of SR 1 + SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0001 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 + sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0001 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn add(i: Instruction, r: &mut Registers) {
    let result = r.get(i.sr1_number()).wrapping_add(if i.is_immediate() {
        i.get_immediate()
    } else {
        r.get(i.sr2_number())
    });
    r.set(i.dr_number(), result);
    r.set_flags(result);
}

/// AND: bit-wise AND in 2 variants
/// - DR is set with result of SR 1 AND SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0101 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 AND sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0101 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn and(i: Instruction, r: &mut Registers) {
    let result = r.get(i.sr1_number())
        & (if i.is_immediate() {
            i.get_immediate()
        } else {
            r.get(i.sr2_number())
        });
    r.set(i.dr_number(), result);
    r.set_flags(result);
}

/// NOT: bit-wise complement of the value in SR 1
/// ```text
///  15__12__11_9__8_6___5___0_
/// | 1001 |  DR | SR1 | 11111 |
///  --------------------------
/// ```
pub fn not(i: Instruction, r: &mut Registers) {
    let result = !r.get(i.sr1_number());
    r.set(i.dr_number(), result);
    r.set_flags(result);
}

/// BR: Conditional Branch
/// Adds the sign extended offset to PC if the bit of `n`, `z` or `p`
/// matching the active [`ConditionFlag`] is set. With none of the
/// bits set BR never branches.
/// ```text
///  15__12__11_9___8_______0_
/// | 0000 |  nzp | PCoffset9 |
///  -------------------------
/// ```
pub fn br(i: Instruction, r: &mut Registers) {
    let test_matches = match r.get_conditional_register() {
        ConditionFlag::Pos => i.get_bit(9),
        ConditionFlag::Zero => i.get_bit(10),
        ConditionFlag::Neg => i.get_bit(11),
    };
    if test_matches {
        r.set_pc(address_by_pc_offset(i, r));
    }
}

/// JMP or RET operation.
/// - JMP sets the PC to the value of register `BaseR`
/// ```text
///  15__12__11_9___8_6____5____0_
/// | 1100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// - RET same as JMP, but special case for returning from JSR where former PC is saved in R7.
/// ```text
///  15__12__11_9__8_6___5____0_
/// | 1100 | 000 | 111 | 000000 |
///  ---------------------------
/// ```
pub fn jmp(i: Instruction, r: &mut Registers) {
    r.set_pc(r.get(i.base_r_number()));
}

/// JSR: Jump to Sub-Routine.
/// Two variants:
/// - JSR to PC + sign extended `PCOffset11`
/// ```text
///  15__12__11_10_________0
/// | 0100 | 1 | PCOffset11 |
///  -----------------------
/// ```
/// - JSRR: JSR to location in `BaseR`
/// ```text
///  15__12__11_9__8___6___5____0_
/// | 0100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// The former PC is saved in R7.
pub fn jsr(i: Instruction, r: &mut Registers) {
    let return_address = r.pc();
    r.set_pc(if i.get_bit(11) {
        r.pc().wrapping_add(i.pc_offset(11))
    } else {
        r.get(i.base_r_number())
    });
    r.set(7, return_address);
}

/// LD: Loads content of memory address of PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 0010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
/// # Errors
/// - console polling failed on a memory-mapped read
pub fn ld(
    i: Instruction,
    r: &mut Registers,
    memory: &mut Memory,
    console: &mut impl Console,
) -> io::Result<()> {
    let value = memory.read(address_by_pc_offset(i, r), console)?;
    r.set(i.dr_number(), value);
    r.set_flags(value);
    Ok(())
}

/// LDI: Load indirect.
/// Calculates memory address of PC + sign extended offset and reads another address from there,
/// the content of the memory at that indirectly loaded address is put into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
/// # Errors
/// - console polling failed on a memory-mapped read
pub fn ldi(
    i: Instruction,
    r: &mut Registers,
    memory: &mut Memory,
    console: &mut impl Console,
) -> io::Result<()> {
    let value_address = memory.read(address_by_pc_offset(i, r), console)?;
    let value = memory.read(value_address, console)?;
    r.set(i.dr_number(), value);
    r.set_flags(value);
    Ok(())
}

/// LDR: Load address from base register and adds sign extended offset to load the memory content
/// from there into DR.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0110 |  DR | BaseR | offset6 |
///  ------------------------------
/// ```
/// # Errors
/// - console polling failed on a memory-mapped read
pub fn ldr(
    i: Instruction,
    r: &mut Registers,
    memory: &mut Memory,
    console: &mut impl Console,
) -> io::Result<()> {
    let value = memory.read(address_by_base_offset(i, r), console)?;
    r.set(i.dr_number(), value);
    r.set_flags(value);
    Ok(())
}

/// LEA: Load Effective Address loads PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1110 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn lea(i: Instruction, r: &mut Registers) {
    let address = address_by_pc_offset(i, r);
    r.set(i.dr_number(), address);
    r.set_flags(address);
}

/// ST: Store. The contents of the SR are written to memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn st(i: Instruction, r: &Registers, memory: &mut Memory) {
    memory.write(address_by_pc_offset(i, r), r.get(i.dr_number()));
}

/// STI: Store Indirect. The contents of the SR are written to the address which is loaded from
/// memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 1011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
/// # Errors
/// - console polling failed on a memory-mapped read
pub fn sti(
    i: Instruction,
    r: &Registers,
    memory: &mut Memory,
    console: &mut impl Console,
) -> io::Result<()> {
    let store_address = memory.read(address_by_pc_offset(i, r), console)?;
    memory.write(store_address, r.get(i.dr_number()));
    Ok(())
}

/// STR: Store contents of SR to memory address of base register plus sign extended offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0111 |  SR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn str(i: Instruction, r: &Registers, memory: &mut Memory) {
    memory.write(address_by_base_offset(i, r), r.get(i.dr_number()));
}

fn address_by_pc_offset(i: Instruction, r: &Registers) -> u16 {
    r.pc().wrapping_add(i.pc_offset(9))
}
fn address_by_base_offset(i: Instruction, r: &Registers) -> u16 {
    r.get(i.base_r_number()).wrapping_add(i.pc_offset(6))
}

#[expect(clippy::unusual_byte_groupings)]
#[cfg(test)]
mod tests {
    use super::{not, *};
    use crate::emulator::test_helpers::FakeConsole;
    use googletest::prelude::*;
    use yare::parameterized;

    fn create_memory(data: &[u16]) -> Memory {
        let mut mem = Memory::new();
        mem.load_image(0x3000, data).expect("Error loading program");
        mem
    }

    #[gtest]
    pub fn test_opcode_add() {
        let mut regs = Registers::new();
        regs.set(0, 22);
        regs.set(1, 128);
        // Add: DR: 2, SR1: 0: 22, Immediate: false, SR2: 1: 128 => R2: 150
        add(0b0001_010_000_0_00_001.into(), &mut regs);
        // Add: DR: 3, SR1: 2: 150, Immediate: true, imm5: 14 => R3: 164
        add(0b0001_011_010_1_01110.into(), &mut regs);
        expect_that!(regs.get(0), eq(22));
        expect_that!(regs.get(1), eq(128));
        expect_that!(regs.get(2), eq(150));
        expect_that!(regs.get(3), eq(164));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Pos));
    }
    #[gtest]
    pub fn test_opcode_add_negative() {
        let mut regs = Registers::new();
        regs.set(0, 22);
        regs.set(1, (-128i16).cast_unsigned());
        // Add: DR: 2, SR1: 0: 22, Immediate: false, SR2: 1: -128 => R2: -106
        add(0b0001_010_000_0_00_001.into(), &mut regs);
        // Add: DR: 3, SR1: 2: -106, Immediate: true, imm5: -2 => R3: -108
        add(0b0001_011_010_1_11110.into(), &mut regs);
        expect_that!(regs.get(2).cast_signed(), eq(-106));
        expect_that!(regs.get(3).cast_signed(), eq(-108));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));
    }
    #[gtest]
    pub fn test_opcode_add_wraps_around() {
        let mut regs = Registers::new();
        regs.set(0, 0x7FFF); // largest positive number in 2's complement
        regs.set(1, 1);
        // Add: DR: 2, SR1: 0, Immediate: false, SR2: 1 => R2: 0x8000
        add(0b0001_010_000_0_00_001.into(), &mut regs);
        expect_that!(regs.get(2), eq(0x8000));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));
    }
    #[gtest]
    pub fn test_opcode_add_result_0() {
        let mut regs = Registers::new();
        regs.set(0, 0x7FFF);
        regs.set(1, !0x7FFF + 1);
        regs.set(2, 1); // to be sure opcode was executed
        add(0b0001_010_000_0_00_001.into(), &mut regs);
        expect_that!(regs.get(2), eq(0));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Zero));
    }
    #[gtest]
    pub fn test_opcode_add_register_and_immediate_mode_agree() {
        let mut reg_mode = Registers::new();
        reg_mode.set(1, 7);
        reg_mode.set(3, 3);
        // Add: DR: 4, SR1: 1, Immediate: false, SR2: 3
        add(0b0001_100_001_0_00_011.into(), &mut reg_mode);

        let mut imm_mode = Registers::new();
        imm_mode.set(1, 7);
        // Add: DR: 4, SR1: 1, Immediate: true, imm5: 3
        add(0b0001_100_001_1_00011.into(), &mut imm_mode);

        expect_that!(reg_mode.get(4), eq(imm_mode.get(4)));
        expect_that!(
            reg_mode.get_conditional_register(),
            eq(imm_mode.get_conditional_register())
        );
        expect_that!(reg_mode.get(4), eq(10));
    }
    #[gtest]
    pub fn test_opcode_and() {
        let mut regs = Registers::new();
        regs.set(0, 0b1101_1001_0111_0101);
        regs.set(1, 0b0100_1010_0010_1001);
        // And: DR: 2, SR1: 0, Immediate: false, SR2: 1
        and(0b0101_010_000_0_00_001.into(), &mut regs);
        expect_that!(regs.get(2), eq(0b0100_1000_0010_0001));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Pos));
    }
    #[gtest]
    pub fn test_opcode_and_immediate() {
        let mut regs = Registers::new();
        regs.set(0, 0b1101_1001_0111_0101);
        // And: DR: 2, SR1: 0, Immediate: true, imm5 sign extended to 0xFFF5
        and(0b0101_010_000_1_10101.into(), &mut regs);
        expect_that!(regs.get(2), eq(0b1101_1001_0111_0101));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));
    }
    #[gtest]
    pub fn test_opcode_not() {
        let mut regs = Registers::new();
        regs.set(0, 0x7FFF);
        // Not: DR: 1, SR1: 0 => R1: 0x8000
        not(0b1001_001_000_111111.into(), &mut regs);
        expect_that!(regs.get(1), eq(0x8000));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));
    }

    #[parameterized(
        on_zero = { 0x0000, 0b010 },
        on_positive = { 0x0001, 0b001 },
        on_negative = { 0x8000, 0b100 },
        any_on_zero = { 0x0000, 0b111 },
        any_on_positive = { 0x0001, 0b111 },
    )]
    pub fn test_opcode_br_taken(flag_value: u16, nzp: u16) {
        let mut regs = Registers::new();
        regs.set_flags(flag_value);
        regs.set_pc(0x3010);
        // Br: PCoffset9: 5
        br(Instruction::from(0b0000_000_000000101 | (nzp << 9)), &mut regs);
        assert_that!(regs.pc(), eq(0x3015));
    }
    #[parameterized(
        positive_on_zero_test = { 0x0001, 0b010 },
        zero_on_negative_test = { 0x0000, 0b100 },
        negative_on_positive_test = { 0x8000, 0b001 },
        never_on_zero = { 0x0000, 0b000 },
        never_on_positive = { 0x0001, 0b000 },
        never_on_negative = { 0x8000, 0b000 },
    )]
    pub fn test_opcode_br_not_taken(flag_value: u16, nzp: u16) {
        let mut regs = Registers::new();
        regs.set_flags(flag_value);
        regs.set_pc(0x3010);
        br(Instruction::from(0b0000_000_000000101 | (nzp << 9)), &mut regs);
        assert_that!(regs.pc(), eq(0x3010));
    }
    #[gtest]
    pub fn test_opcode_br_negative_offset() {
        let mut regs = Registers::new();
        regs.set_flags(0);
        regs.set_pc(0x3010);
        // Br: z, PCoffset9: -16
        br(0b0000_010_111110000.into(), &mut regs);
        expect_that!(regs.pc(), eq(0x3000));
    }

    #[gtest]
    pub fn test_opcode_lea() {
        let mut regs = Registers::new();
        regs.set_pc(0x3045);
        // Lea: DR: 3, PCoffset9: 0x55
        lea(0b1110_011_0_0101_0101.into(), &mut regs);
        expect_that!(regs.get(3), eq(0x3045 + 0b0_0101_0101));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Pos));
    }
    #[gtest]
    pub fn test_opcode_ld() {
        let mut console = FakeConsole::new("");
        let mut regs = Registers::new();
        regs.set_pc(0x3045);
        let mut memory = create_memory(&[4711, 815]);
        // Ld: DR: 4, PCoffset9: -0x44
        ld(0b0010_100_1_1011_1100.into(), &mut regs, &mut memory, &mut console).unwrap();
        expect_that!(regs.get(4), eq(815));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Pos));

        // Ld: DR: 4, PCoffset9: -0x45
        ld(0b0010_100_1_1011_1011.into(), &mut regs, &mut memory, &mut console).unwrap();
        expect_that!(regs.get(4), eq(4711));
    }
    #[gtest]
    pub fn test_opcode_ldr() {
        let mut console = FakeConsole::new("");
        let mut regs = Registers::new();
        let mut raw = vec![0; 6];
        let mem_val = 0b1111_1111_1111_0110; // -10
        raw[5] = mem_val;
        let mut memory = create_memory(&raw);
        regs.set(6, 0x3025);
        // Ldr: DR: 2, BaseR: 6, offset6: -32 = -0x20
        ldr(0b0110_010_110_100000.into(), &mut regs, &mut memory, &mut console).unwrap();
        expect_that!(regs.get(2), eq(mem_val));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));
    }
    #[gtest]
    pub fn test_opcode_ldi() {
        let mut console = FakeConsole::new("");
        let mut regs = Registers::new();
        let mut raw = vec![0; 10];
        let val_to_load = 0b1111_1111_1111_0110; // -10
        raw[3] = val_to_load;
        raw[5] = 0x3003; // absolute address of value above
        let mut memory = create_memory(&raw);
        regs.set_pc(0x3065);
        // Ldi: DR: 1, PCoffset9: -96 = -0x60
        ldi(0b1010_001_110100000.into(), &mut regs, &mut memory, &mut console).unwrap();
        expect_that!(regs.get(1), eq(val_to_load));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));
    }
    #[gtest]
    pub fn test_opcode_st() {
        let mut console = FakeConsole::new("");
        let mut regs = Registers::new();
        let mut memory = Memory::new();
        regs.set(5, 4760);
        regs.set_pc(0x3065);
        // St: SR: 5, PCoffset9: -95 = -0x5F
        st(0b0011_101_110100001.into(), &regs, &mut memory);
        expect_that!(memory.read(0x3006, &mut console).unwrap(), eq(4760));
    }
    #[gtest]
    pub fn test_opcode_sti() {
        let mut console = FakeConsole::new("");
        let mut regs = Registers::new();
        let mut memory = Memory::new();
        memory.write(0x300A, 0x3006);
        regs.set(7, 1234);
        regs.set_pc(0x3067);
        // Sti: SR: 7, PCoffset9: -0x5D
        sti(0b1011_111_110100011.into(), &regs, &mut memory, &mut console).unwrap();
        expect_that!(memory.read(0x3006, &mut console).unwrap(), eq(1234));
    }
    #[gtest]
    pub fn test_opcode_str() {
        let mut console = FakeConsole::new("");
        let mut regs = Registers::new();
        let mut memory = Memory::new();
        regs.set(2, 2345);
        regs.set(6, 0x3005);
        // Str: SR: 2, BaseR: 6, offset6: 0x1
        str(0b0111_010_110_000001.into(), &regs, &mut memory);
        expect_that!(memory.read(0x3006, &mut console).unwrap(), eq(2345));
    }
    #[gtest]
    pub fn test_opcode_jsr() {
        let mut regs = Registers::new();
        regs.set_pc(0x3099);
        // Jsr: PCoffset11: 0x1A1
        jsr(0b0100_1_00110100001.into(), &mut regs);
        expect_that!(regs.pc(), eq(0x323A));
        expect_that!(regs.get(7), eq(0x3099));

        let mut regs = Registers::new();
        regs.set_pc(0x3100);
        regs.set(6, 0x3456);
        // Jsrr: BaseR: 6
        jsr(0b0100_000_110_000000.into(), &mut regs);
        expect_that!(regs.pc(), eq(0x3456));
        expect_that!(regs.get(7), eq(0x3100));
    }
    #[gtest]
    pub fn test_opcode_jsrr_base_register_is_r7() {
        let mut regs = Registers::new();
        regs.set_pc(0x3100);
        regs.set(7, 0x4000);
        // Jsrr: BaseR: 7, the old R7 value is the jump target
        jsr(0b0100_000_111_000000.into(), &mut regs);
        expect_that!(regs.pc(), eq(0x4000));
        expect_that!(regs.get(7), eq(0x3100));
    }
    #[gtest]
    pub fn test_opcode_jmp() {
        let mut regs = Registers::new();
        regs.set_pc(0x3020);
        regs.set(1, 0x3022);
        // Jmp: BaseR: 1
        jmp(0b1100_000_001_000000.into(), &mut regs);
        expect_that!(regs.pc(), eq(0x3022));
    }
    #[gtest]
    pub fn test_flags_untouched_by_stores_and_jumps() {
        let mut regs = Registers::new();
        let mut memory = Memory::new();
        regs.set_flags(1); // Pos
        regs.set(0, 0x8000);
        st(0b0011_000_000000101.into(), &regs, &mut memory);
        jmp(0b1100_000_000_000000.into(), &mut regs);
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Pos));
    }
}
