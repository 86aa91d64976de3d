use thiserror::Error;

/// Errors that abort a run of the machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Program does not consist of whole (opcode, operand) pairs.
    #[error("malformed program: odd length {len}")]
    MalformedProgram { len: usize },

    #[error("invalid opcode {opcode} at {pointer}")]
    InvalidOpcode { pointer: usize, opcode: i64 },

    /// Combo operand outside `0..=6`.
    #[error("invalid combo operand {operand} at {pointer}")]
    InvalidComboOperand { pointer: usize, operand: i64 },

    #[error("negative division exponent {exponent} at {pointer}")]
    NegativeExponent { pointer: usize, exponent: i64 },

    /// Jump target is negative or does not point at an opcode.
    #[error("invalid jump target {target} at {pointer}")]
    InvalidJump { pointer: usize, target: i64 },

    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: usize },
}

/// Errors raised while reading a textual listing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing register {0}")]
    MissingRegister(char),

    #[error("missing program line")]
    MissingProgram,

    #[error("line {line}: invalid integer `{value}`")]
    InvalidInteger { line: usize, value: String },

    #[error(transparent)]
    Malformed(#[from] VmError),
}
