use std::fmt::Display;

use crate::error::VmError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: i64,
    pub b: i64,
    pub c: i64,
}

impl Registers {
    pub fn new(a: i64, b: i64, c: i64) -> Self {
        Self { a, b, c }
    }
}

impl From<(i64, i64, i64)> for Registers {
    fn from((a, b, c): (i64, i64, i64)) -> Self {
        Self { a, b, c }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cpu {
    pub regs: Registers,
    pub pc: usize,  // Index of the next opcode to fetch
}

impl Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cpu [ a: {}, b: {}, c: {}, pc: {} ]",
            self.regs.a, self.regs.b, self.regs.c, self.pc
        )
    }
}

impl Cpu {
    pub fn new(regs: Registers) -> Self {
        Cpu { regs, pc: 0 }
    }

    /// Resolves a combo operand against the current registers.
    ///
    /// Values `0..=3` are literals, `4..=6` select A, B and C. Anything else,
    /// including the reserved `7`, is rejected.
    pub fn combo(&self, operand: i64) -> Result<i64, VmError> {
        match operand {
            0..=3 => Ok(operand),
            4 => Ok(self.regs.a),
            5 => Ok(self.regs.b),
            6 => Ok(self.regs.c),
            _ => Err(VmError::InvalidComboOperand {
                pointer: self.pc,
                operand,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    ADV =   0,  // A = A / 2^combo
    BXL =   1,  // B = B ^ literal
    BST =   2,  // B = combo % 8
    JNZ =   3,  // if A != 0 then PC = literal
    BXC =   4,  // B = B ^ C
    OUT =   5,  // emit combo % 8
    BDV =   6,  // B = A / 2^combo
    CDV =   7,  // C = A / 2^combo
}

impl OpCode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::ADV => "adv",
            Self::BXL => "bxl",
            Self::BST => "bst",
            Self::JNZ => "jnz",
            Self::BXC => "bxc",
            Self::OUT => "out",
            Self::BDV => "bdv",
            Self::CDV => "cdv",
        }
    }
}

impl TryFrom<i64> for OpCode {
    type Error = i64;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::ADV),
            1 => Ok(Self::BXL),
            2 => Ok(Self::BST),
            3 => Ok(Self::JNZ),
            4 => Ok(Self::BXC),
            5 => Ok(Self::OUT),
            6 => Ok(Self::BDV),
            7 => Ok(Self::CDV),
            _ => Err(v),
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Floor division of `value` by `2^exponent`.
///
/// Arithmetic right shift rounds toward negative infinity. Exponents past
/// the width of `i64` saturate. Returns `None` for a negative exponent.
pub fn floor_div_pow2(value: i64, exponent: i64) -> Option<i64> {
    if exponent < 0 {
        return None;
    }
    if exponent >= i64::BITS as i64 - 1 {
        // |value| <= 2^63, so the quotient collapses to its sign
        return Some(if value < 0 { -1 } else { 0 });
    }
    Some(value >> exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_literals_and_registers() {
        let cpu = Cpu::new(Registers::new(10, 20, 30));
        assert_eq!(cpu.combo(0), Ok(0));
        assert_eq!(cpu.combo(3), Ok(3));
        assert_eq!(cpu.combo(4), Ok(10));
        assert_eq!(cpu.combo(5), Ok(20));
        assert_eq!(cpu.combo(6), Ok(30));
    }

    #[test]
    fn combo_rejects_reserved_operand() {
        let mut cpu = Cpu::new(Registers::default());
        cpu.pc = 4;
        assert_eq!(
            cpu.combo(7),
            Err(VmError::InvalidComboOperand { pointer: 4, operand: 7 })
        );
        assert!(cpu.combo(-1).is_err());
        assert!(cpu.combo(8).is_err());
    }

    #[test]
    fn opcode_decoding() {
        for code in 0..8 {
            let op = OpCode::try_from(code).unwrap();
            assert_eq!(op as i64, code);
        }
        assert_eq!(OpCode::try_from(8), Err(8));
        assert_eq!(OpCode::try_from(-1), Err(-1));
        assert_eq!(OpCode::JNZ.to_string(), "jnz");
    }

    #[test]
    fn floor_division_by_powers_of_two() {
        assert_eq!(floor_div_pow2(9, 1), Some(4));
        assert_eq!(floor_div_pow2(729, 0), Some(729));
        assert_eq!(floor_div_pow2(-9, 1), Some(-5));
        assert_eq!(floor_div_pow2(-7, 2), Some(-2));
        assert_eq!(floor_div_pow2(i64::MAX, 63), Some(0));
        assert_eq!(floor_div_pow2(i64::MIN, 63), Some(-1));
        assert_eq!(floor_div_pow2(5, 1_000), Some(0));
        assert_eq!(floor_div_pow2(-5, 1_000), Some(-1));
        assert_eq!(floor_div_pow2(5, -1), None);
    }
}
