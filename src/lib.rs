pub mod cpu;
pub mod error;
pub mod program;

use itertools::Itertools;
use log::{debug, info, warn};

pub use cpu::{Cpu, OpCode, Registers};
pub use error::{ParseError, VmError};
pub use program::{Listing, Program};

#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Stop at the first `out` instead of running until the pointer leaves
    /// the program.
    pub halt_on_output: bool,
    pub max_steps: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            halt_on_output: true,
            max_steps: None,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// An `out` instruction executed while `halt_on_output` was set.
    Output,
    /// The instruction pointer moved past the last instruction.
    EndOfProgram,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: Vec<u8>,
    pub halt: Halt,
    pub cpu: Cpu,
    pub steps: usize,
}

enum Step {
    Next,
    Jump(usize),
    Emit(u8),
}

pub struct Machine {
    cpu: Cpu,
    config: MachineConfig,
    steps: usize,
}

impl Machine {
    pub fn new(registers: Registers) -> Self {
        Self::with_config(registers, MachineConfig::default())
    }

    pub fn with_config(registers: Registers, config: MachineConfig) -> Self {
        Machine {
            cpu: Cpu::new(registers),
            config,
            steps: 0,
        }
    }

    fn debug_state(&self, opcode: i64, operand: i64) {
        debug!(
            "State: A: {}, B: {}, C: {}, PC: {:#04x} | code: {} op: {}",
            self.cpu.regs.a, self.cpu.regs.b, self.cpu.regs.c, self.cpu.pc, opcode, operand
        );
    }

    fn divide_a(&self, operand: i64) -> Result<i64, VmError> {
        let exponent = self.cpu.combo(operand)?;
        cpu::floor_div_pow2(self.cpu.regs.a, exponent).ok_or(VmError::NegativeExponent {
            pointer: self.cpu.pc,
            exponent,
        })
    }

    fn interpret(&mut self, opcode: i64, operand: i64) -> Result<Step, VmError> {
        let instr = OpCode::try_from(opcode).map_err(|opcode| VmError::InvalidOpcode {
            pointer: self.cpu.pc,
            opcode,
        })?;

        match instr {
            OpCode::ADV => {
                self.cpu.regs.a = self.divide_a(operand)?;
            }
            OpCode::BXL => {
                self.cpu.regs.b ^= operand;
            }
            OpCode::BST => {
                self.cpu.regs.b = self.cpu.combo(operand)?.rem_euclid(8);
            }
            OpCode::JNZ => {
                if self.cpu.regs.a != 0 {
                    let target = usize::try_from(operand)
                        .ok()
                        .filter(|target| target % 2 == 0)
                        .ok_or(VmError::InvalidJump {
                            pointer: self.cpu.pc,
                            target: operand,
                        })?;
                    return Ok(Step::Jump(target));
                }
            }
            OpCode::BXC => {
                self.cpu.regs.b ^= self.cpu.regs.c;
            }
            OpCode::OUT => {
                let value = self.cpu.combo(operand)?.rem_euclid(8) as u8;
                return Ok(Step::Emit(value));
            }
            OpCode::BDV => {
                self.cpu.regs.b = self.divide_a(operand)?;
            }
            OpCode::CDV => {
                self.cpu.regs.c = self.divide_a(operand)?;
            }
        }

        Ok(Step::Next)
    }

    fn cycle(&mut self, program: &Program, output: &mut Vec<u8>) -> Result<Halt, VmError> {
        // As long as the pointer addresses a whole instruction
        while let Some((opcode, operand)) = program.fetch(self.cpu.pc) {
            if let Some(limit) = self.config.max_steps {
                if self.steps >= limit {
                    return Err(VmError::StepLimitExceeded { limit });
                }
            }
            self.steps += 1;
            self.debug_state(opcode, operand);

            match self.interpret(opcode, operand)? {
                Step::Next => self.cpu.pc += 2,
                Step::Jump(target) => self.cpu.pc = target,
                Step::Emit(value) => {
                    output.push(value);
                    if self.config.halt_on_output {
                        return Ok(Halt::Output);
                    }
                    self.cpu.pc += 2;
                }
            }
        }

        Ok(Halt::EndOfProgram)
    }

    /// Runs `program` until it halts, returning the output together with the
    /// halt reason and the final machine state.
    pub fn execute(mut self, program: &Program) -> Result<Outcome, VmError> {
        let mut output = Vec::new();

        let halt = match self.cycle(program, &mut output) {
            Ok(halt) => halt,
            Err(e) => {
                warn!("run aborted after {} steps: {}", self.steps, e);
                return Err(e);
            }
        };

        info!("{} halted ({:?}) after {} steps", self.cpu, halt, self.steps);

        Ok(Outcome {
            output,
            halt,
            cpu: self.cpu,
            steps: self.steps,
        })
    }

    pub fn run(self, program: &Program) -> Result<Vec<u8>, VmError> {
        self.execute(program).map(|outcome| outcome.output)
    }
}

/// Runs `program` from `registers` with the default configuration.
pub fn run(registers: Registers, program: &Program) -> Result<Vec<u8>, VmError> {
    Machine::new(registers).run(program)
}

/// Joins output values with commas.
pub fn format_output(output: &[u8]) -> String {
    output.iter().join(",")
}
