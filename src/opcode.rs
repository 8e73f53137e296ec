//! Opcode abstractions, functionality and constants.
use std::convert::TryFrom;

use crate::{MemoryError, OpcodeError, ProcessError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a nibble
const NIBBLE: u16 = 0x4;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// The literal that is skipped without ever being decoded.
pub const NO_OPERATION: Opcode = 0x0000;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::MemoryError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # assert_eq!(
/// #    Err(MemoryError::OutOfBounds { address: 3, len: 2 }),
/// #    build_opcode(&SPLIT_OPCODE, 3)
/// # );
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, MemoryError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(MemoryError::OutOfBounds {
            address: pointer,
            len: 2,
        })
    }
}

/// These are special traits used to filter out the fields of an opcode.
pub trait OpcodeTrait {
    /// the opcode type, the highest nibble
    fn t(&self) -> u8;

    /// the lowest twelve bits, an address
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16;

    /// the lowest byte, a constant
    fn nn(&self) -> u8;

    /// the lowest nibble
    fn n(&self) -> u8;

    /// the register index in bits 8 - 11
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize;

    /// the register index in bits 4 - 7
    fn y(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * NIBBLE)) as u8
    }

    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    fn nn(&self) -> u8 {
        (self & OPCODE_MASK_00FF) as u8
    }

    fn n(&self) -> u8 {
        (self & OPCODE_MASK_000F) as u8
    }

    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> (2 * NIBBLE)) as usize
    }

    fn y(&self) -> usize {
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        ((self & MASK) >> NIBBLE) as usize
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the movement of the program counter after an instruction ran.
/// The fetch already moved the counter onto the next instruction.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    Next,
    /// Will jump over the following instruction
    Skip,
    /// Will simply move the program counter to the given location.
    Jump(u16),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Applies the step to the given program counter.
    #[inline]
    pub fn apply(self, program_counter: u16) -> u16 {
        use crate::definitions::memory::opcodes;
        match self {
            ProgramCounterStep::Next => program_counter,
            ProgramCounterStep::Skip => program_counter.wrapping_add(opcodes::SIZE),
            ProgramCounterStep::Jump(pointer) => pointer,
        }
    }
}

/// The outcome of an instruction, as seen from the outside.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operation {
    None,
    /// The chipset waits for a key press.
    Wait,
    /// The display changed.
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zero {
    /// 00E0
    Clear,
    /// 00EE
    Return,
}

/// The low nibble of the `8XYN` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    /// 8XY0 `VX = VY`
    Move,
    /// 8XY1 `VX |= VY`
    Or,
    /// 8XY2 `VX &= VY`
    And,
    /// 8XY3 `VX ^= VY`
    Xor,
    /// 8XY4 `VX += VY`, `VF` is the carry
    Add,
    /// 8XY5 `VX -= VY`, `VF` is the "no borrow" flag
    Sub,
    /// 8XY6 `VX >>= 1`, `VF` is the shifted out bit
    ShiftRight,
    /// 8XY7 `VX = VY - VX`, `VF` is the "no borrow" flag
    SubReverse,
    /// 8XYE `VX <<= 1`, `VF` is the shifted out bit
    ShiftLeft,
}

impl TryFrom<u8> for Arithmetic {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let ops = match value {
            0x0 => Arithmetic::Move,
            0x1 => Arithmetic::Or,
            0x2 => Arithmetic::And,
            0x3 => Arithmetic::Xor,
            0x4 => Arithmetic::Add,
            0x5 => Arithmetic::Sub,
            0x6 => Arithmetic::ShiftRight,
            0x7 => Arithmetic::SubReverse,
            0xE => Arithmetic::ShiftLeft,
            _ => return Err(()),
        };
        Ok(ops)
    }
}

/// The low byte of the `EXNN` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// EX9E
    Pressed,
    /// EXA1
    NotPressed,
}

impl TryFrom<u8> for Key {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x9E => Ok(Key::Pressed),
            0xA1 => Ok(Key::NotPressed),
            _ => Err(()),
        }
    }
}

/// The low byte of the `FXNN` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Misc {
    /// FX07
    GetDelayTimer,
    /// FX0A, blocks all instructions until a key is pressed.
    AwaitKeyPress,
    /// FX15
    SetDelayTimer,
    /// FX18
    SetSoundTimer,
    /// FX1E
    AddVxToI,
    /// FX29
    SetIToSprite,
    /// FX33
    StoreBCD,
    /// FX55
    StoreRegisters,
    /// FX65
    LoadRegisters,
}

impl TryFrom<u8> for Misc {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let ops = match value {
            0x07 => Misc::GetDelayTimer,
            0x0A => Misc::AwaitKeyPress,
            0x15 => Misc::SetDelayTimer,
            0x18 => Misc::SetSoundTimer,
            0x1E => Misc::AddVxToI,
            0x29 => Misc::SetIToSprite,
            0x33 => Misc::StoreBCD,
            0x55 => Misc::StoreRegisters,
            0x65 => Misc::LoadRegisters,
            _ => return Err(()),
        };
        Ok(ops)
    }
}

/// A decoded instruction. The variant is selected by the highest nibble, the groups
/// `0`, `8`, `E` and `F` carry a second tag taken from the low nibble or byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Zero(Zero),
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipIfEqualConst { x: usize, nn: u8 },
    /// 4XNN
    SkipIfNotEqualConst { x: usize, nn: u8 },
    /// 5XY0
    SkipIfEqual { x: usize, y: usize },
    /// 6XNN
    SetConst { x: usize, nn: u8 },
    /// 7XNN
    AddConst { x: usize, nn: u8 },
    /// 8XYN
    Arithmetic { ops: Arithmetic, x: usize, y: usize },
    /// 9XY0
    SkipIfNotEqual { x: usize, y: usize },
    /// ANNN
    SetIndex { nnn: u16 },
    /// BNNN
    JumpWithOffset { nnn: u16, x: usize },
    /// CXNN
    Random { x: usize, nn: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EXNN
    Key { ops: Key, x: usize },
    /// FXNN
    Misc { ops: Misc, x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let err = || OpcodeError::InvalidOpcode(value);
        let (x, y) = (value.x(), value.y());

        let res = match value.t() {
            0x0 => match value {
                0x00E0 => Instruction::Zero(Zero::Clear),
                0x00EE => Instruction::Zero(Zero::Return),
                _ => return Err(err()),
            },
            0x1 => Instruction::Jump { nnn: value.nnn() },
            0x2 => Instruction::Call { nnn: value.nnn() },
            0x3 => Instruction::SkipIfEqualConst { x, nn: value.nn() },
            0x4 => Instruction::SkipIfNotEqualConst { x, nn: value.nn() },
            0x5 if value.n() == 0 => Instruction::SkipIfEqual { x, y },
            0x6 => Instruction::SetConst { x, nn: value.nn() },
            0x7 => Instruction::AddConst { x, nn: value.nn() },
            0x8 => {
                let ops = Arithmetic::try_from(value.n()).map_err(|_| err())?;
                Instruction::Arithmetic { ops, x, y }
            }
            0x9 if value.n() == 0 => Instruction::SkipIfNotEqual { x, y },
            0xA => Instruction::SetIndex { nnn: value.nnn() },
            0xB => Instruction::JumpWithOffset { nnn: value.nnn(), x },
            0xC => Instruction::Random { x, nn: value.nn() },
            0xD => Instruction::Draw { x, y, n: value.n() },
            0xE => {
                let ops = Key::try_from(value.nn()).map_err(|_| err())?;
                Instruction::Key { ops, x }
            }
            0xF => {
                let ops = Misc::try_from(value.nn()).map_err(|_| err())?;
                Instruction::Misc { ops, x }
            }
            _ => return Err(err()),
        };
        Ok(res)
    }
}

/// Represents a step of the program counter
pub trait ProgramCounter {
    fn step(&mut self, step: ProgramCounterStep);
}

/// The executor, a single method per instruction group.
pub trait ChipOpcodes: ProgramCounter {
    fn calc(&mut self, instruction: &Instruction) -> Result<Operation, ProcessError> {
        let mut operation = Operation::None;
        let step_op = |(step, op)| {
            operation = op;
            step
        };

        let step = match *instruction {
            Instruction::Zero(ops) => self.zero(ops).map(step_op),
            Instruction::Jump { nnn } => self.jump(nnn),
            Instruction::Call { nnn } => self.call(nnn),
            Instruction::SkipIfEqualConst { x, nn } => self.skip_if_const(x, nn, true),
            Instruction::SkipIfNotEqualConst { x, nn } => self.skip_if_const(x, nn, false),
            Instruction::SkipIfEqual { x, y } => self.skip_if_registers(x, y, true),
            Instruction::SkipIfNotEqual { x, y } => self.skip_if_registers(x, y, false),
            Instruction::SetConst { x, nn } => self.set_const(x, nn),
            Instruction::AddConst { x, nn } => self.add_const(x, nn),
            Instruction::Arithmetic { ops, x, y } => self.arithmetic(ops, x, y),
            Instruction::SetIndex { nnn } => self.set_index(nnn),
            Instruction::JumpWithOffset { nnn, x } => self.jump_with_offset(nnn, x),
            Instruction::Random { x, nn } => self.random(x, nn),
            Instruction::Draw { x, y, n } => self.draw(x, y, n).map(step_op),
            Instruction::Key { ops, x } => self.key(ops, x),
            Instruction::Misc { ops, x } => self.misc(ops, x).map(step_op),
        }?;

        self.step(step);
        Ok(operation)
    }

    fn zero(&mut self, ops: Zero) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    fn jump(&self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    fn call(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    fn skip_if_const(&self, x: usize, nn: u8, equal: bool) -> Result<ProgramCounterStep, ProcessError>;

    fn skip_if_registers(
        &self,
        x: usize,
        y: usize,
        equal: bool,
    ) -> Result<ProgramCounterStep, ProcessError>;

    fn set_const(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    fn add_const(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    fn arithmetic(
        &mut self,
        ops: Arithmetic,
        x: usize,
        y: usize,
    ) -> Result<ProgramCounterStep, ProcessError>;

    fn set_index(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    fn jump_with_offset(&self, nnn: u16, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    fn random(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    fn draw(
        &mut self,
        x: usize,
        y: usize,
        n: u8,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    fn key(&self, ops: Key, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    fn misc(&mut self, ops: Misc, x: usize) -> Result<(ProgramCounterStep, Operation), ProcessError>;
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    #[test]
    fn test_extract_fields() {
        let opcode: Opcode = 0xD4A7;
        assert_eq!(opcode.t(), 0xD);
        assert_eq!(opcode.x(), 0x4);
        assert_eq!(opcode.y(), 0xA);
        assert_eq!(opcode.n(), 0x7);
        assert_eq!(opcode.nn(), 0xA7);
        assert_eq!(opcode.nnn(), 0x4A7);
    }

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        let conv: Result<Instruction, _> = value.try_into();
        assert_eq!(conv, Ok(Instruction::Zero(Zero::Clear)));
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x00E1;
        let conv: Result<Instruction, _> = value.try_into();
        assert_eq!(conv, Err(OpcodeError::InvalidOpcode(0x00E1)));
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        let tests = [
            (0x00EE, Some(Instruction::Zero(Zero::Return))),
            (0x0123, None),
            (0x1919, Some(Instruction::Jump { nnn: 0x919 })),
            (0x2222, Some(Instruction::Call { nnn: 0x222 })),
            (0x3123, Some(Instruction::SkipIfEqualConst { x: 0x1, nn: 0x23 })),
            (0x4123, Some(Instruction::SkipIfNotEqualConst { x: 0x1, nn: 0x23 })),
            (0x5120, Some(Instruction::SkipIfEqual { x: 0x1, y: 0x2 })),
            (0x5121, None),
            (0x6123, Some(Instruction::SetConst { x: 0x1, nn: 0x23 })),
            (0x7123, Some(Instruction::AddConst { x: 0x1, nn: 0x23 })),
            (
                0x8124,
                Some(Instruction::Arithmetic {
                    ops: Arithmetic::Add,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x812E,
                Some(Instruction::Arithmetic {
                    ops: Arithmetic::ShiftLeft,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (0x8128, None),
            (0x9120, Some(Instruction::SkipIfNotEqual { x: 0x1, y: 0x2 })),
            (0x9121, None),
            (0xA222, Some(Instruction::SetIndex { nnn: 0x222 })),
            (0xB322, Some(Instruction::JumpWithOffset { nnn: 0x322, x: 0x3 })),
            (0xC123, Some(Instruction::Random { x: 0x1, nn: 0x23 })),
            (0xD123, Some(Instruction::Draw { x: 0x1, y: 0x2, n: 0x3 })),
            (
                0xE19E,
                Some(Instruction::Key {
                    ops: Key::Pressed,
                    x: 0x1,
                }),
            ),
            (
                0xE1A1,
                Some(Instruction::Key {
                    ops: Key::NotPressed,
                    x: 0x1,
                }),
            ),
            (0xE111, None),
            (
                0xF50A,
                Some(Instruction::Misc {
                    ops: Misc::AwaitKeyPress,
                    x: 0x5,
                }),
            ),
            (
                0xF165,
                Some(Instruction::Misc {
                    ops: Misc::LoadRegisters,
                    x: 0x1,
                }),
            ),
            (0xF0FF, None),
        ];

        for (opcode, expected) in tests.iter() {
            let conv = Instruction::try_from(*opcode).ok();
            assert_eq!(&conv, expected, "decoding {:#06X}", opcode);
        }
    }

    #[test]
    fn test_program_counter_step() {
        assert_eq!(ProgramCounterStep::Next.apply(0x202), 0x202);
        assert_eq!(ProgramCounterStep::Skip.apply(0x202), 0x204);
        assert_eq!(ProgramCounterStep::Jump(0x300).apply(0x202), 0x300);
    }
}
