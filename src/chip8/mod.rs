//! The full implementation of the chip8 interpreter, from the machine state and the cycle
//! driver to the opcodes and an option to pretty print the state.
mod chipset;
mod opcodes;
mod print;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
