use thiserror::Error;

use crate::opcode::Opcode;

/// Fatal errors raised while executing a program.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ProcessError {
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("Invalid memory access '{0}'.")]
    Memory(#[from] MemoryError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum MemoryError {
    #[error("Access of {len} byte(s) at {address:#06X} is outside of the address space")]
    OutOfBounds { address: usize, len: usize },
}

/// Errors raised while preparing a program image.
#[derive(Error, Debug)]
pub enum RomError {
    #[error("Unable to read the program file: {0}")]
    Io(#[from] std::io::Error),
    #[error("The program is {len} bytes long, but only {max} bytes fit into memory")]
    TooLarge { len: usize, max: usize },
}
