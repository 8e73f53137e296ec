//! The terminal front end, drawing the frame buffer with `tui` and reading the
//! keyboard with `crossterm`.

use std::{
    io::{self, Stdout, Write},
    time::Duration,
};

use chip::{
    definitions::{display, keyboard},
    devices::{DisplayCommands, FrameBuffer, KeySnapshot, KeyboardCommands},
};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::Spans,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

/// Terminals only report key presses, so a key counts as held for this many
/// ticks after its last press event.
const HOLD_TICKS: u8 = 6;

/// Every terminal cell shows two pixel rows.
const CELL_ROWS: usize = 2;

/// Draws the chip display into the alternate screen of the terminal, the
/// terminal is restored once this is dropped.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
    beeping: bool,
    /// the last frame, kept for redrawing the title
    frame: FrameBuffer,
}

impl TerminalDisplay {
    pub fn new(title: String) -> io::Result<Self> {
        terminal::enable_raw_mode().map_err(to_io)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(to_io)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            title,
            beeping: false,
            frame: FrameBuffer::new(),
        })
    }

    fn draw(&mut self) -> io::Result<()> {
        let title = if self.beeping {
            format!(" {} \u{266A} ", self.title)
        } else {
            format!(" {} ", self.title)
        };
        let lines = render(&self.frame);

        self.terminal.draw(|f| {
            let size = f.size();
            let area = Rect::new(
                0,
                0,
                size.width.min(display::WIDTH as u16 + 2),
                size.height.min((display::HEIGHT / CELL_ROWS) as u16 + 2),
            );
            let screen =
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(screen, area);
        })?;

        Ok(())
    }
}

impl DisplayCommands for TerminalDisplay {
    fn display(&mut self, pixels: &FrameBuffer) {
        self.frame.clone_from(pixels);
        if let Err(err) = self.draw() {
            log::error!("unable to draw the display: {}", err);
        }
    }

    fn beep(&mut self, active: bool) {
        self.beeping = active;
        if let Err(err) = self.draw() {
            log::error!("unable to draw the display: {}", err);
        }
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Folds two pixel rows into a single line of half blocks.
fn render(frame: &FrameBuffer) -> Vec<Spans<'static>> {
    let rows: Vec<_> = frame.rows().collect();

    rows.chunks(CELL_ROWS)
        .map(|pair| {
            let line: String = (0..display::WIDTH)
                .map(|x| {
                    let top = pair[0][x];
                    let bottom = pair.get(1).map_or(false, |row| row[x]);
                    match (top, bottom) {
                        (true, true) => '\u{2588}',
                        (true, false) => '\u{2580}',
                        (false, true) => '\u{2584}',
                        (false, false) => ' ',
                    }
                })
                .collect();
            Spans::from(line)
        })
        .collect()
}

fn to_io(err: crossterm::ErrorKind) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

/// Reads the pending key events from the terminal without blocking.
#[derive(Default)]
pub struct TerminalKeyboard {
    /// remaining ticks every key is held for
    held: [u8; keyboard::SIZE],
}

impl TerminalKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the event queue, returns `false` if the user wants to quit.
    fn poll(&mut self) -> crossterm::Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            let key = match event::read()? {
                Event::Key(key) => key,
                _ => continue,
            };

            match key.code {
                KeyCode::Esc => return Ok(false),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(false)
                }
                KeyCode::Char(c) => match keyboard::key_index(c) {
                    Some(index) => self.held[index] = HOLD_TICKS,
                    None => log::debug!("the key {:?} is not mapped", c),
                },
                _ => {}
            }
        }

        Ok(true)
    }
}

impl KeyboardCommands for TerminalKeyboard {
    fn get_keyboard(&mut self) -> Option<KeySnapshot> {
        match self.poll() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => {
                log::error!("unable to read the keyboard: {}", err);
                return None;
            }
        }

        let mut keys = [false; keyboard::SIZE];
        for (key, held) in keys.iter_mut().zip(self.held.iter_mut()) {
            *key = *held > 0;
            *held = held.saturating_sub(1);
        }

        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_folds_rows() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(0, 0, 0b1010_0000);
        frame.draw_sprite(0, 1, 0b1100_0000);

        let lines = render(&frame);
        assert_eq!(lines.len(), display::HEIGHT / CELL_ROWS);

        let first: String = lines[0].0.iter().map(|span| span.content.as_ref()).collect();
        assert!(first.starts_with("\u{2588}\u{2584}\u{2580} "));
        assert_eq!(first.chars().count(), display::WIDTH);
    }
}
