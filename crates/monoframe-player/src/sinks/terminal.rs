//! Terminal output using Unicode half blocks, two pixel rows per text row.

use std::io::Write;

use monoframe_core::framebuffer::packed_pixel;
use monoframe_core::{HEIGHT, WIDTH};

use super::FrameSink;

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";

/// Renders a packed buffer as `HEIGHT / 2` lines of `WIDTH` characters.
pub fn render_half_blocks(buffer: &[u8]) -> String {
    let mut out = String::with_capacity((WIDTH * 3 + 1) * HEIGHT / 2);
    for y in (0..HEIGHT).step_by(2) {
        for x in 0..WIDTH {
            let top = packed_pixel(buffer, x, y);
            let bottom = packed_pixel(buffer, x, y + 1);
            out.push(match (top, bottom) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }
    out
}

/// Redraws each frame in place on a terminal.
pub struct TerminalSink<W> {
    out: W,
    started: bool,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            started: false,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> FrameSink for TerminalSink<W> {
    fn name(&self) -> &str {
        "terminal"
    }

    fn present(&mut self, _frame: u64, buffer: &[u8]) -> monoframe_core::Result<()> {
        if !self.started {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
            self.started = true;
        }
        self.out.write_all(CURSOR_HOME.as_bytes())?;
        self.out.write_all(render_half_blocks(buffer).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monoframe_core::{Canvas, Ink};

    #[test]
    fn test_half_block_mapping() {
        let mut canvas = Canvas::new();
        canvas.set_pixel(0, 0, Ink::Set);
        canvas.set_pixel(1, 1, Ink::Set);
        canvas.set_pixel(2, 0, Ink::Set);
        canvas.set_pixel(2, 1, Ink::Set);

        let text = render_half_blocks(canvas.buffer());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), HEIGHT / 2);
        assert!(lines.iter().all(|l| l.chars().count() == WIDTH));
        assert!(lines[0].starts_with("▀▄█ "));
        assert!(lines[1].chars().all(|c| c == ' '));
    }

    #[test]
    fn test_clears_screen_once() {
        let mut sink = TerminalSink::new(Vec::new());
        let buffer = [0u8; monoframe_core::BUFFER_LEN];
        sink.present(0, &buffer).unwrap();
        sink.present(1, &buffer).unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written.matches(CLEAR_SCREEN).count(), 1);
        assert_eq!(written.matches(CURSOR_HOME).count(), 2);
    }
}
