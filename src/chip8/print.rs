//! The pretty print implementation of the [`chipset`](super::ChipSet).
//! It is used for tracing and split up into this file for higher cohesion.

use std::fmt::{self, Write};

use super::ChipSet;
use crate::definitions::cpu;

/// The amount of bytes shown per memory line
const HEX_PRINT_STEP: usize = 8;

const INDENT: &str = "\t";

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({})",
            self.name,
            self.config.compatibility.name()
        )?;
        writeln!(
            f,
            "{}pc: {:#06X} opcode: {:#06X} index: {:#06X} delay: {:#04X} sound: {:#04X}",
            INDENT,
            self.program_counter,
            self.opcode,
            self.index_register,
            self.delay_timer.get_value(),
            self.sound_timer.get_value(),
        )?;
        writeln!(f, "{}registers: {}", INDENT, registers(&self.registers))?;
        writeln!(f, "{}stack: {:04X?}", INDENT, &self.stack[..])?;
        if self.keyboard.is_waiting() {
            writeln!(f, "{}waiting for a key press", INDENT)?;
        }
        writeln!(f, "{}program:", INDENT)?;
        f.write_str(&memory_dump(
            &self.memory[..],
            cpu::PROGRAM_COUNTER,
            self.program_len,
        ))
    }
}

/// `V0=0x00 V1=0x00 ...`
fn registers(registers: &[u8]) -> String {
    registers
        .iter()
        .enumerate()
        .map(|(i, v)| format!("V{:X}={:#04X}", i, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Will print `len` bytes of memory starting at `from`, prefixed by their address.
fn memory_dump(memory: &[u8], from: usize, len: usize) -> String {
    let to = (from + len).min(memory.len());
    let mut text = String::with_capacity(len * 6);

    for start in (from..to).step_by(HEX_PRINT_STEP) {
        let end = (start + HEX_PRINT_STEP).min(to);
        // writing into a string can not fail
        let _ = write!(text, "{}{}{:#06X} :", INDENT, INDENT, start);
        for byte in &memory[start..end] {
            let _ = write!(text, " {:02X}", byte);
        }
        text.push('\n');
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_dump() {
        let memory: Vec<u8> = (0..0x20).collect();
        let dump = memory_dump(&memory, 0x4, 10);
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(
            lines,
            vec![
                "\t\t0x0004 : 04 05 06 07 08 09 0A 0B",
                "\t\t0x000C : 0C 0D",
            ]
        );
    }

    #[test]
    fn test_registers() {
        let regs = [0xAB; cpu::register::SIZE];
        let text = registers(&regs);
        assert!(text.starts_with("V0=0xAB V1=0xAB"));
        assert!(text.ends_with("VF=0xAB"));
    }
}
