use std::str::FromStr;

use crate::cpu::Registers;
use crate::error::{ParseError, VmError};

/// An immutable instruction sequence made of (opcode, operand) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    code: Vec<i64>,
}

impl Program {
    pub fn new(code: Vec<i64>) -> Result<Self, VmError> {
        if code.len() % 2 != 0 {
            return Err(VmError::MalformedProgram { len: code.len() });
        }
        Ok(Self { code })
    }

    /// Returns the (opcode, operand) pair starting at `pointer`.
    pub fn fetch(&self, pointer: usize) -> Option<(i64, i64)> {
        let opcode = *self.code.get(pointer)?;
        let operand = *self.code.get(pointer + 1)?;
        Some((opcode, operand))
    }

    pub fn code(&self) -> &[i64] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl TryFrom<Vec<i64>> for Program {
    type Error = VmError;

    fn try_from(code: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

/// Initial registers and program, as read from a textual listing:
///
/// ```text
/// Register A: 729
/// Register B: 0
/// Register C: 0
///
/// Program: 0,1,5,4,3,0
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub registers: Registers,
    pub program: Program,
}

fn parse_int(line: usize, value: &str) -> Result<i64, ParseError> {
    let value = value.trim();
    value.parse().map_err(|_| ParseError::InvalidInteger {
        line,
        value: value.to_string(),
    })
}

impl FromStr for Listing {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut regs = [None; 3];
        let mut program = None;

        for (index, line) in s.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();

            if let Some(rest) = line.strip_prefix("Register ") {
                let (name, value) = match rest.split_once(':') {
                    Some(parts) => parts,
                    None => continue,
                };
                let slot = match name.trim() {
                    "A" => 0,
                    "B" => 1,
                    "C" => 2,
                    _ => continue,
                };
                regs[slot] = Some(parse_int(line_no, value)?);
            } else if let Some(rest) = line.strip_prefix("Program:") {
                let code = rest
                    .split(',')
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| parse_int(line_no, v))
                    .collect::<Result<Vec<_>, _>>()?;
                program = Some(Program::new(code)?);
            }
        }

        let [a, b, c] = regs;
        Ok(Listing {
            registers: Registers::new(
                a.ok_or(ParseError::MissingRegister('A'))?,
                b.ok_or(ParseError::MissingRegister('B'))?,
                c.ok_or(ParseError::MissingRegister('C'))?,
            ),
            program: program.ok_or(ParseError::MissingProgram)?,
        })
    }
}
