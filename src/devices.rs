use crate::definitions::{display, keyboard};

/// A snapshot of all the keys, indexed by their hex value.
pub type KeySnapshot = [bool; keyboard::SIZE];

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will display all from the pixels
    fn display(&mut self, pixels: &FrameBuffer);
    /// Will be called whenever the sound timer starts or stops running.
    fn beep(&mut self, active: bool);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
pub trait KeyboardCommands {
    /// Will return the current state of all the keys or `None` if the
    /// user asked to stop the machine.
    fn get_keyboard(&mut self) -> Option<KeySnapshot>;
}

/// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
/// `(64 x 32)`. Every cell is either set or unset.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[[bool; display::WIDTH]; display::HEIGHT]>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            pixels: Box::new([[false; display::WIDTH]; display::HEIGHT]),
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will unset every pixel.
    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.iter_mut().for_each(|pixel| *pixel = false);
        }
    }

    /// Draws a single sprite row at the given coordinates, both of them wrap around the
    /// screen. Returns `true` if any pixel was flipped from set to unset.
    pub fn draw_sprite(&mut self, x: usize, y: usize, row: u8) -> bool {
        let y = y % display::HEIGHT;
        let mut collision = false;

        for k in 0..display::SPRITE_WIDTH {
            let bit = (row >> (display::SPRITE_WIDTH - 1 - k)) & 0x1 == 0x1;
            let x = (x + k) % display::WIDTH;

            let pixel = &mut self.pixels[y][x];
            let before = *pixel;
            *pixel ^= bit;

            if before && !*pixel {
                collision = true;
            }
        }

        collision
    }

    /// The state of the pixel, the coordinates wrap around the screen.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % display::HEIGHT][x % display::WIDTH]
    }

    /// Iterates over all the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool; display::WIDTH]> + '_ {
        self.pixels.iter()
    }

    /// The amount of set pixels.
    pub fn count(&self) -> usize {
        self.rows().flatten().filter(|&&p| p).count()
    }
}

/// Will store the state of the keyboard as it was at the last refresh
/// and represent the internal keyboard as well
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone)]
pub struct Keyboard {
    keys: KeySnapshot,
    /// The register that receives the next pressed key, while set no instructions will
    /// be executed.
    waiting: Option<usize>,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// Replaces the whole keyboard state with the given snapshot.
    pub fn refresh(&mut self, keys: &KeySnapshot) {
        self.keys.copy_from_slice(keys);
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }

    /// Is the given key pressed, keys outside of the keyboard never are.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// The highest pressed key.
    pub fn pressed(&self) -> Option<usize> {
        self.keys.iter().rposition(|&k| k)
    }

    /// Halts the machine until a key is pressed, the key will be stored into `register`.
    pub fn wait_for(&mut self, register: usize) {
        self.waiting = Some(register);
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// Ends the wait if a key is pressed in the current snapshot, returning the waiting
    /// register and the key.
    pub fn resolve_wait(&mut self) -> Option<(usize, usize)> {
        let register = self.waiting?;
        let key = self.pressed()?;
        self.waiting = None;
        Some((register, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_sprite_sets_pixels() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw_sprite(2, 3, 0b1010_0001));

        let row: Vec<bool> = (2..10).map(|x| fb.get(x, 3)).collect();
        assert_eq!(
            row,
            vec![true, false, true, false, false, false, false, true]
        );
        assert_eq!(fb.count(), 3);
    }

    #[test]
    fn test_draw_sprite_collision() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw_sprite(10, 10, 0xFF));
        assert!(fb.draw_sprite(10, 10, 0xFF));
        assert_eq!(fb.count(), 0);

        // flipping an unset pixel on is no collision
        assert!(!fb.draw_sprite(10, 10, 0xF0));
        assert!(!fb.draw_sprite(10, 10, 0x0F));
        assert_eq!(fb.count(), 8);
    }

    #[test]
    fn test_draw_sprite_wraps_around() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(60, 33, 0xFF);

        for x in (60..64).chain(0..4) {
            assert!(fb.get(x, 1), "pixel {} should be set", x);
        }
        assert_eq!(fb.count(), 8);
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 0, 0xFF);
        fb.draw_sprite(5, 31, 0xFF);
        fb.clear();
        assert!(fb.rows().flatten().all(|&p| !p));
    }

    #[test]
    fn test_keyboard_refresh() {
        let mut keyboard = Keyboard::new();
        let mut keys = [false; keyboard::SIZE];
        keys[0x3] = true;
        keys[0xA] = true;

        keyboard.refresh(&keys);
        assert!(keyboard.is_pressed(0x3));
        assert!(!keyboard.is_pressed(0x4));
        assert!(!keyboard.is_pressed(0xFF));
        assert_eq!(keyboard.pressed(), Some(0xA));

        keyboard.refresh(&[false; keyboard::SIZE]);
        assert_eq!(keyboard.pressed(), None);
    }

    #[test]
    fn test_keyboard_wait() {
        let mut keyboard = Keyboard::new();
        assert_eq!(keyboard.resolve_wait(), None);

        keyboard.wait_for(0x2);
        assert!(keyboard.is_waiting());
        assert_eq!(keyboard.resolve_wait(), None);
        assert!(keyboard.is_waiting());

        let mut keys = [false; keyboard::SIZE];
        keys[0x7] = true;
        keyboard.refresh(&keys);

        assert_eq!(keyboard.resolve_wait(), Some((0x2, 0x7)));
        assert!(!keyboard.is_waiting());
    }
}
