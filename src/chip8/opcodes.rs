use crate::{
    definitions::{cpu, display},
    opcode::{Arithmetic, ChipOpcodes, Key, Misc, Operation, ProgramCounterStep, Zero},
    ProcessError,
};

use super::ChipSet;

impl ChipOpcodes for ChipSet {
    fn zero(&mut self, ops: Zero) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        match ops {
            Zero::Clear => {
                // 00E0
                // clear display
                self.display.clear();
                Ok((ProgramCounterStep::Next, Operation::Draw))
            }
            Zero::Return => {
                // 00EE
                // Return from sub routine => pop from stack
                let pc = self.pop_stack()?;
                log::debug!("return to {:#06X}", pc);
                Ok((ProgramCounterStep::Jump(pc), Operation::None))
            }
        }
    }

    fn jump(&self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // 1NNN
        // Jumps to address NNN.
        Ok(ProgramCounterStep::Jump(nnn))
    }

    fn call(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // 2NNN
        // Calls subroutine at NNN, the program counter already points at the
        // instruction to return to.
        self.push_stack(self.program_counter)?;
        Ok(ProgramCounterStep::Jump(nnn))
    }

    fn skip_if_const(&self, x: usize, nn: u8, equal: bool) -> Result<ProgramCounterStep, ProcessError> {
        // 3XNN / 4XNN
        // Skips the next instruction if VX equals (doesn't equal) NN.
        Ok(ProgramCounterStep::cond((self.registers[x] == nn) == equal))
    }

    fn skip_if_registers(
        &self,
        x: usize,
        y: usize,
        equal: bool,
    ) -> Result<ProgramCounterStep, ProcessError> {
        // 5XY0 / 9XY0
        // Skips the next instruction if VX equals (doesn't equal) VY.
        Ok(ProgramCounterStep::cond(
            (self.registers[x] == self.registers[y]) == equal,
        ))
    }

    fn set_const(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 6XNN
        self.registers[x] = nn;
        Ok(ProgramCounterStep::Next)
    }

    fn add_const(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 7XNN
        // Adds NN to VX. (Carry flag is not changed)
        self.registers[x] = self.registers[x].wrapping_add(nn);
        Ok(ProgramCounterStep::Next)
    }

    fn arithmetic(
        &mut self,
        ops: Arithmetic,
        x: usize,
        y: usize,
    ) -> Result<ProgramCounterStep, ProcessError> {
        // both operands are read before anything is written, so that `VF`
        // works as an operand as well
        let (vx, vy) = (self.registers[x], self.registers[y]);
        let shift_source = if self.config.compatibility.shift_reads_vy() {
            vy
        } else {
            vx
        };

        let (value, flag) = match ops {
            Arithmetic::Move => (vy, None),
            Arithmetic::Or => (vx | vy, None),
            Arithmetic::And => (vx & vy, None),
            Arithmetic::Xor => (vx ^ vy, None),
            Arithmetic::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry as u8))
            }
            Arithmetic::Sub => (vx.wrapping_sub(vy), Some((vx >= vy) as u8)),
            Arithmetic::ShiftRight => (shift_source >> 1, Some(shift_source & 0x1)),
            Arithmetic::SubReverse => (vy.wrapping_sub(vx), Some((vy >= vx) as u8)),
            Arithmetic::ShiftLeft => (shift_source << 1, Some((shift_source >> 7) & 0x1)),
        };

        if let Some(flag) = flag {
            self.registers[cpu::register::LAST] = flag;
        }
        self.registers[x] = value;

        Ok(ProgramCounterStep::Next)
    }

    fn set_index(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // ANNN
        self.index_register = nnn;
        Ok(ProgramCounterStep::Next)
    }

    fn jump_with_offset(&self, nnn: u16, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // BNNN
        // Jumps to the address NNN plus V0 (legacy) or VX (modern).
        let register = self.config.compatibility.jump_offset_register(x);
        Ok(ProgramCounterStep::Jump(
            nnn.wrapping_add(self.registers[register] as u16),
        ))
    }

    fn random(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError> {
        // CXNN
        // Sets VX to the result of a bitwise and operation on a random number and NN.
        let random = self.rng.next_u32() as u8;
        self.registers[x] = random & nn;
        Ok(ProgramCounterStep::Next)
    }

    fn draw(
        &mut self,
        x: usize,
        y: usize,
        n: u8,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // DXYN
        // Draws a sprite at coordinate (VX, VY) that has a width of 8 pixels and a height of N
        // pixels. Each row of 8 pixels is read as bit-coded starting from memory location I; I
        // value doesn't change after the execution of this instruction. VF is set to 1 if any
        // screen pixels are flipped from set to unset when the sprite is drawn, and to 0 if that
        // doesn't happen.
        let range = self.memory_range(self.index_register as usize, n as usize)?;
        let coorx = self.registers[x] as usize;
        let coory = self.registers[y] as usize;

        let mut collision = false;
        for (i, row) in self.memory[range].iter().enumerate() {
            collision |= self.display.draw_sprite(coorx, coory + i, *row);
        }

        self.registers[cpu::register::LAST] = collision as u8;
        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn key(&self, ops: Key, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        // EX9E / EXA1
        // Skips the next instruction if the key stored in VX is (isn't) pressed.
        let pressed = self.keyboard.is_pressed(self.registers[x] as usize);
        let step = match ops {
            Key::Pressed => ProgramCounterStep::cond(pressed),
            Key::NotPressed => ProgramCounterStep::cond(!pressed),
        };
        Ok(step)
    }

    fn misc(&mut self, ops: Misc, x: usize) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let mut operation = Operation::None;

        match ops {
            Misc::GetDelayTimer => self.registers[x] = self.delay_timer.get_value(),
            Misc::SetDelayTimer => self.delay_timer.set_value(self.registers[x]),
            Misc::SetSoundTimer => self.sound_timer.set_value(self.registers[x]),
            Misc::AwaitKeyPress => match self.keyboard.pressed() {
                Some(key) => self.registers[x] = key as u8,
                None => {
                    // FX0A
                    // Blocking Operation. All instruction halted until the next key press.
                    log::debug!("waiting for a key press to store into V{:X}", x);
                    self.keyboard.wait_for(x);
                    operation = Operation::Wait;
                }
            },
            Misc::AddVxToI => {
                // FX1E
                // Adds VX to I, VF is set as soon as I grows over 1000 and left as is otherwise.
                self.index_register = self
                    .index_register
                    .wrapping_add(self.registers[x] as u16);
                if self.index_register > cpu::INDEX_OVERFLOW {
                    self.registers[cpu::register::LAST] = 1;
                }
            }
            Misc::SetIToSprite => {
                // FX29
                // Sets I to the location of the sprite for the character in VX.
                let glyph = self.registers[x] as usize * display::fontset::GLYPH_SIZE;
                self.index_register = (display::fontset::LOCATION + glyph) as u16;
            }
            Misc::StoreBCD => {
                // FX33
                // The hundreds digit at I, the tens digit at I+1, and the ones digit at I+2.
                let range = self.memory_range(self.index_register as usize, 3)?;
                let value = self.registers[x];
                self.memory[range].copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
            }
            Misc::StoreRegisters => {
                // FX55
                // Stores V0 up to (excluding) VX in memory starting at address I.
                let range = self.memory_range(self.index_register as usize, x)?;
                self.memory[range].copy_from_slice(&self.registers[..x]);
                self.advance_index(x);
            }
            Misc::LoadRegisters => {
                // FX65
                // Fills V0 up to (excluding) VX with values from memory starting at address I.
                let range = self.memory_range(self.index_register as usize, x)?;
                self.registers[..x].copy_from_slice(&self.memory[range]);
                self.advance_index(x);
            }
        }

        Ok((ProgramCounterStep::Next, operation))
    }
}

impl ChipSet {
    /// The index register is moved behind the transferred block in legacy mode only.
    fn advance_index(&mut self, by: usize) {
        if self.config.compatibility.block_transfer_moves_index() {
            self.index_register = self.index_register.wrapping_add(by as u16);
        }
    }
}
