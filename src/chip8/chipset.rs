use std::{convert::TryFrom, ops::Range};

use {
    crate::{
        config::Config,
        definitions::{cpu, display, memory},
        devices::{FrameBuffer, KeySnapshot, Keyboard},
        opcode::{
            self, ChipOpcodes, Instruction, Opcode, Operation, ProgramCounter, ProgramCounterStep,
        },
        resources::Rom,
        timer::Timer,
        MemoryError, ProcessError, StackError,
    },
    rand::RngCore,
    tinyvec::ArrayVec,
};

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// The size of the loaded program
    pub(super) program_len: usize,
    /// Fixed for the lifetime of the chipset.
    pub(super) config: Config,
    /// all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x050` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x050-0x1FF` - Reserved
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Box<[u8; memory::SIZE]>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: u16,
    /// The program counter is a CPU register in the computer processor which has the address of the
    /// next instruction to be executed from memory.
    pub(super) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called.
    pub(super) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound should be made.
    pub(super) sound_timer: Timer,
    /// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
    /// `(64 x 32)`.
    pub(super) display: FrameBuffer,
    pub(super) keyboard: Keyboard,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
    /// The fatal error that halted the chipset.
    pub(super) fault: Option<ProcessError>,
}

impl ChipSet {
    /// will create a new chipset object
    pub fn new(rom: Rom, config: Config) -> Self {
        // initialize all the memory with 0
        let mut ram = Box::new([0; memory::SIZE]);

        // load fonts
        ram[display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        // write the rom data into memory, the rom guarantees that it fits
        let data = rom.get_data();
        ram[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + data.len())].copy_from_slice(data);

        Self {
            name: rom.get_name().to_string(),
            program_len: data.len(),
            config,
            opcode: 0,
            memory: ram,
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER as u16,
            stack: ArrayVec::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            display: FrameBuffer::new(),
            keyboard: Keyboard::new(),
            rng: Box::new(rand::rngs::OsRng),
            fault: None,
        }
    }

    /// Replaces the random number generator used by `CXNN`.
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// A single cycle: counts the timers down, takes over the given keyboard state
    /// and runs the next instruction, unless the chipset waits for a key press.
    ///
    /// After a fatal error every further tick will report the same error.
    pub fn tick(&mut self, keys: &KeySnapshot) -> Result<Operation, ProcessError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        self.delay_timer.tick();
        self.sound_timer.tick();

        self.keyboard.refresh(keys);

        if self.keyboard.is_waiting() {
            return match self.keyboard.resolve_wait() {
                Some((register, key)) => {
                    log::debug!("key {:#X} pressed, stored into V{:X}", key, register);
                    self.registers[register] = key as u8;
                    Ok(Operation::None)
                }
                None => Ok(Operation::Wait),
            };
        }

        self.next().map_err(|err| {
            log::error!(
                "halting at {:#06X} after opcode {:#06X}: {}",
                self.program_counter,
                self.opcode,
                err
            );
            self.fault = Some(err.clone());
            err
        })
    }

    /// will get the next opcode from memory
    pub(super) fn set_opcode(&mut self) -> Result<(), ProcessError> {
        // will build the opcode given from the pointer
        self.opcode = opcode::build_opcode(&self.memory[..], self.program_counter as usize)?;
        Ok(())
    }

    /// will advance the program by a single step, fetching moves the program counter
    /// onto the following instruction before the fetched one is executed
    pub fn next(&mut self) -> Result<Operation, ProcessError> {
        self.set_opcode()?;
        log::trace!("{:#06X}: {:#06X}", self.program_counter, self.opcode);

        self.program_counter = self
            .program_counter
            .wrapping_add(memory::opcodes::SIZE);

        self.execute(self.opcode)
    }

    /// Executes a single opcode, unknown opcodes are reported and skipped.
    pub fn execute(&mut self, opcode: Opcode) -> Result<Operation, ProcessError> {
        if opcode == opcode::NO_OPERATION {
            return Ok(Operation::None);
        }

        match Instruction::try_from(opcode) {
            Ok(instruction) => {
                log::debug!("{:?}", instruction);
                self.calc(&instruction)
            }
            Err(err) => {
                log::warn!("{} Skipping it.", err);
                Ok(Operation::None)
            }
        }
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool] {
        self.keyboard.get_keys()
    }

    /// Is the chipset halted until a key is pressed
    pub fn is_waiting(&self) -> bool {
        self.keyboard.is_waiting()
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// Will return the current display configuration
    pub fn get_display(&self) -> &FrameBuffer {
        &self.display
    }

    pub fn get_registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn get_program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn get_index_register(&self) -> u16 {
        self.index_register
    }

    pub fn get_memory(&self) -> &[u8] {
        &self.memory[..]
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// The fatal error that halted the chipset, if any.
    pub fn get_fault(&self) -> Option<&ProcessError> {
        self.fault.as_ref()
    }

    /// Will push the pointer to the stack
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        if self.stack.len() == self.stack.capacity() {
            Err(StackError::Full)
        } else {
            self.stack.push(pointer);
            Ok(())
        }
    }

    /// Will pop from the stack
    pub(super) fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }

    /// The memory range of `len` bytes starting at `start`, if all of it is inside of the
    /// address space.
    pub(super) fn memory_range(&self, start: usize, len: usize) -> Result<Range<usize>, MemoryError> {
        if len == 0 {
            Ok(0..0)
        } else if start + len <= self.memory.len() {
            Ok(start..(start + len))
        } else {
            Err(MemoryError::OutOfBounds {
                address: start,
                len,
            })
        }
    }
}

impl ProgramCounter for ChipSet {
    fn step(&mut self, step: ProgramCounterStep) {
        self.program_counter = step.apply(self.program_counter);
    }
}
