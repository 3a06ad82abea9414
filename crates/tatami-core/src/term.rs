#![forbid(unsafe_code)]

//! Crossterm-backed terminal surface.
//!
//! [`TermSurface`] owns the real terminal for the life of the program:
//! raw mode and the alternate screen are entered on construction and
//! restored on drop, including on panic unwind.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event as cte;
use crossterm::{cursor, execute, queue, style, terminal};

use crate::color::Color;
use crate::event::KeyEvent;
use crate::surface::{InputHooks, Surface};

/// Options for opening a [`TermSurface`].
#[derive(Debug, Clone)]
pub struct TermOptions {
    /// Fallback width when the terminal size cannot be queried.
    pub width: i32,
    /// Fallback height when the terminal size cannot be queried.
    pub height: i32,
    /// Window title, applied via the terminal's title escape.
    pub title: String,
    /// Whether to capture pointer motion.
    pub mouse_capture: bool,
    /// How long one `poll` waits for input before returning.
    pub poll_timeout: Duration,
}

impl Default for TermOptions {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            title: String::new(),
            mouse_capture: true,
            poll_timeout: Duration::from_millis(25),
        }
    }
}

impl TermOptions {
    /// Options with an explicit fallback size and title.
    #[must_use]
    pub fn new(width: i32, height: i32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A [`Surface`] over the process's controlling terminal.
pub struct TermSurface {
    out: Stdout,
    hooks: InputHooks,
    options: TermOptions,
    close: bool,
}

impl TermSurface {
    /// Enter raw mode and the alternate screen.
    pub fn new(options: TermOptions) -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        if !options.title.is_empty() {
            execute!(out, terminal::SetTitle(options.title.as_str()))?;
        }
        if options.mouse_capture {
            execute!(out, cte::EnableMouseCapture)?;
        }
        Ok(Self {
            out,
            hooks: InputHooks::new(),
            options,
            close: false,
        })
    }

    fn convert(&mut self, event: cte::Event) {
        match event {
            cte::Event::Key(key) if key.kind != cte::KeyEventKind::Release => {
                // Ctrl+C is the terminal's close request; it is still
                // delivered to handlers so applications can intercept it.
                if key.code == cte::KeyCode::Char('c')
                    && key.modifiers.contains(cte::KeyModifiers::CONTROL)
                {
                    self.close = true;
                }
                if let Some(key) = KeyEvent::from_crossterm(key) {
                    self.hooks.emit_key(key);
                }
            }
            cte::Event::Mouse(mouse) if mouse.kind == cte::MouseEventKind::Moved => {
                self.hooks
                    .emit_pointer(i32::from(mouse.column), i32::from(mouse.row));
            }
            // Resize is observed by the run loop polling `size`.
            _ => {}
        }
    }
}

impl Surface for TermSurface {
    fn size(&self) -> (i32, i32) {
        match terminal::size() {
            Ok((w, h)) => (i32::from(w), i32::from(h)),
            Err(_) => (self.options.width, self.options.height),
        }
    }

    fn should_close(&self) -> bool {
        self.close
    }

    fn set(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        let (width, height) = self.size();
        if x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        // Errors on queued writes surface at the next present.
        let _ = queue!(
            self.out,
            cursor::MoveTo(x as u16, y as u16),
            style::SetForegroundColor(to_crossterm(fg)),
            style::SetBackgroundColor(to_crossterm(bg)),
            style::Print(ch),
        );
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn poll(&mut self) -> io::Result<()> {
        if !cte::poll(self.options.poll_timeout)? {
            return Ok(());
        }
        loop {
            let event = cte::read()?;
            self.convert(event);
            if !cte::poll(Duration::ZERO)? {
                return Ok(());
            }
        }
    }

    fn hooks(&self) -> InputHooks {
        self.hooks.clone()
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        if self.options.mouse_capture {
            let _ = execute!(self.out, cte::DisableMouseCapture);
        }
        let _ = execute!(self.out, terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Map an ANSI color onto crossterm's named palette.
const fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_defaults() {
        let options = TermOptions::default();
        assert_eq!(options.width, 80);
        assert_eq!(options.height, 24);
        assert!(options.mouse_capture);
    }

    #[test]
    fn options_new_sets_size_and_title() {
        let options = TermOptions::new(120, 40, "demo");
        assert_eq!(options.width, 120);
        assert_eq!(options.height, 40);
        assert_eq!(options.title, "demo");
    }

    #[test]
    fn color_mapping_is_total_and_distinct() {
        let mut seen = Vec::new();
        for idx in 0..16u8 {
            let color = Color::from_u8(idx).unwrap();
            let ct = to_crossterm(color);
            assert!(!seen.contains(&ct), "duplicate mapping for {color:?}");
            seen.push(ct);
        }
    }
}
