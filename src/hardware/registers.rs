/// Address execution starts from, by LC-3 convention.
pub const PC_START: u16 = 0x3000;

/// The LC-3 register file: eight general purpose registers, the
/// program counter and the condition flag register.
///
/// R7 holds subroutine return addresses by convention, the hardware
/// does not treat it specially outside of JSR/TRAP.
#[derive(Debug)]
pub struct Registers {
    general_purpose: [u16; 8],
    pc: u16,
    cond: ConditionFlag,
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            general_purpose: [0u16; 8],
            pc: PC_START,
            cond: ConditionFlag::Zero,
        }
    }

    /// # Panics
    /// - asserts that `r` is a valid register number
    #[must_use]
    pub fn get(&self, r: u8) -> u16 {
        assert!(r <= 7, "Invalid general purpose register get");
        self.general_purpose[usize::from(r)]
    }
    /// # Panics
    /// - asserts that `r` is a valid register number
    pub fn set(&mut self, r: u8, value: u16) {
        assert!(r <= 7, "Invalid general purpose register set");
        self.general_purpose[usize::from(r)] = value;
    }

    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }
    pub const fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    #[must_use]
    pub const fn get_conditional_register(&self) -> ConditionFlag {
        self.cond
    }
    /// Sets exactly one condition flag from the sign of `value`
    /// interpreted as a two's complement 16-bit integer.
    pub fn set_flags(&mut self, value: u16) {
        self.cond = ConditionFlag::from(value);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Condition flags, exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    Pos = 1 << 0,
    Zero = 1 << 1,
    Neg = 1 << 2,
}

impl From<u16> for ConditionFlag {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit is 1 for negative numbers
            Self::Neg
        } else {
            Self::Pos
        }
    }
}
