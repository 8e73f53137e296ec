use std::{
    thread,
    time::{Duration, Instant},
};

use crate::{
    chip8::ChipSet,
    devices::{DisplayCommands, KeyboardCommands},
    opcode::Operation,
    ProcessError,
};

/// Drives a chipset at the configured cadence, one tick per interval, feeding it the
/// keyboard and showing the display whenever it changed.
pub struct Runner<D, K>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    chip: ChipSet,
    display: D,
    keyboard: K,
    interval: Duration,
    /// the display was shown at least once
    shown: bool,
    beeping: bool,
}

impl<D, K> Runner<D, K>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    pub fn new(chip: ChipSet, display: D, keyboard: K) -> Self {
        let interval = Duration::from_micros(1_000_000 / chip.get_config().hertz.max(1));
        Self {
            chip,
            display,
            keyboard,
            interval,
            shown: false,
            beeping: false,
        }
    }

    pub fn get_chip(&self) -> &ChipSet {
        &self.chip
    }

    /// A single tick, returns `false` once the keyboard asked to stop.
    pub fn step(&mut self) -> Result<bool, ProcessError> {
        let keys = match self.keyboard.get_keyboard() {
            Some(keys) => keys,
            None => return Ok(false),
        };

        let operation = self.chip.tick(&keys)?;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", self.chip);
        }

        if matches!(operation, Operation::Draw) || !self.shown {
            self.display.display(self.chip.get_display());
            self.shown = true;
        }

        let beeping = self.chip.get_sound_timer() > 0;
        if beeping != self.beeping {
            self.display.beep(beeping);
            self.beeping = beeping;
        }

        Ok(true)
    }

    /// Will run until the keyboard asks to stop or the chipset fails, returning the
    /// chipset for further inspection.
    pub fn run(mut self) -> Result<ChipSet, ProcessError> {
        log::info!(
            "running {} at {} Hz",
            self.chip.get_name(),
            self.chip.get_config().hertz
        );

        loop {
            let start = Instant::now();

            if !self.step()? {
                break;
            }

            // make sure the system will at most wait the interval
            let elapsed = start.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }

        Ok(self.chip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        definitions::keyboard,
        devices::{MockDisplayCommands, MockKeyboardCommands},
        resources::Rom,
        StackError,
    };

    fn chip(program: &[u8]) -> ChipSet {
        let rom = Rom::new("runner", program.to_vec()).unwrap();
        ChipSet::new(rom, Config::default().with_hertz(1000))
    }

    fn keyboard_for(ticks: usize) -> MockKeyboardCommands {
        let mut keyboard = MockKeyboardCommands::new();
        let mut calls = 0;
        keyboard.expect_get_keyboard().returning(move || {
            calls += 1;
            if calls <= ticks {
                Some([false; keyboard::SIZE])
            } else {
                None
            }
        });
        keyboard
    }

    #[test]
    fn test_run_until_stopped() {
        // 6000 A000 D001 1206 (V0 = 0, I = 0, draw a glyph row, loop)
        let program = [0x60, 0x00, 0xA0, 0x00, 0xD0, 0x01, 0x12, 0x06];

        let mut display = MockDisplayCommands::new();
        // once for the first tick and once for the draw
        display
            .expect_display()
            .times(2)
            .returning(|_| ());

        let runner = Runner::new(chip(&program), display, keyboard_for(5));
        let chip = runner.run().unwrap();

        assert_eq!(chip.get_program_counter(), 0x206);
        assert_eq!(chip.get_display().count(), 4);
    }

    #[test]
    fn test_run_stops_on_fault() {
        // 00EE with an empty stack
        let program = [0x00, 0xEE];

        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);

        let runner = Runner::new(chip(&program), display, keyboard_for(5));
        let res = runner.run();

        assert!(matches!(
            res,
            Err(ProcessError::Stack(StackError::Empty))
        ));
    }

    #[test]
    fn test_beep_follows_sound_timer() {
        // 6003 F018 1204 (sound timer = 3, loop)
        let program = [0x60, 0x03, 0xF0, 0x18, 0x12, 0x04];

        let mut display = MockDisplayCommands::new();
        display.expect_display().returning(|_| ());
        let mut seq = mockall::Sequence::new();
        display
            .expect_beep()
            .with(mockall::predicate::eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ());
        display
            .expect_beep()
            .with(mockall::predicate::eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ());

        let runner = Runner::new(chip(&program), display, keyboard_for(8));
        let chip = runner.run().unwrap();
        assert_eq!(chip.get_sound_timer(), 0);
    }

    #[test]
    fn test_step_reports_stop() {
        let mut display = MockDisplayCommands::new();
        display.expect_display().returning(|_| ());

        let mut runner = Runner::new(chip(&[0x12, 0x00]), display, keyboard_for(1));
        assert_eq!(runner.step(), Ok(true));
        assert_eq!(runner.step(), Ok(false));
        assert_eq!(runner.get_chip().get_program_counter(), 0x200);
    }
}
