/// Represents a timer inside of the chip infrastructure, it will count
/// down to zero from what ever number it was given, one step per cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }

    /// Counts down by one, stops at zero.
    pub fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Is the timer still counting.
    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let mut timer = Timer::new(3);
        assert!(timer.is_active());

        for expected in [2, 1, 0, 0].iter() {
            timer.tick();
            assert_eq!(timer.get_value(), *expected);
        }
        assert!(!timer.is_active());

        timer.set_value(0xFF);
        timer.tick();
        assert_eq!(timer.get_value(), 0xFE);
    }
}
