#![forbid(unsafe_code)]

//! The terminal surface collaborator contract.
//!
//! The framework never owns a character grid of its own: everything renders
//! through a [`Surface`], which exposes the current size, a close-request
//! flag, per-cell writes, a present/flush step, input polling, and handler
//! registration hooks for key presses and pointer motion.
//!
//! The runtime owns the surface exclusively. Widgets only ever see it as the
//! scoped reference passed into their render call, and input subscriptions
//! reach it indirectly through [`InputHooks`].

use std::io;
use std::sync::{Arc, Mutex};

use crate::color::Color;
use crate::event::KeyEvent;

/// A terminal surface: the single output and input endpoint of a program.
pub trait Surface {
    /// Current size in cells as `(width, height)`.
    fn size(&self) -> (i32, i32);

    /// Whether the surface has received an external close request.
    fn should_close(&self) -> bool;

    /// Write one cell. Out-of-bounds writes are silently dropped.
    fn set(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color);

    /// Flush buffered writes so they become visible.
    fn present(&mut self) -> io::Result<()>;

    /// Poll for input, invoking registered handlers for anything ready.
    ///
    /// Handlers run on the calling thread before this returns. May block
    /// briefly (implementation-defined) but must not wait indefinitely:
    /// the run loop polls the size between calls.
    fn poll(&mut self) -> io::Result<()>;

    /// Handler registration hooks for this surface's input streams.
    fn hooks(&self) -> InputHooks;
}

/// Identifies a registered input handler so it can be detached later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type KeyHandler = Box<dyn FnMut(KeyEvent) + Send>;
type PointerHandler = Box<dyn FnMut(i32, i32) + Send>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    keys: Vec<(HandlerId, KeyHandler)>,
    pointers: Vec<(HandlerId, PointerHandler)>,
}

impl Registry {
    fn next(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Shared registry of key-down and pointer-move handlers for one surface.
///
/// Cloning yields another handle onto the same registry. Surfaces call the
/// `emit_*` methods from their `poll`; input subscriptions register and
/// remove handlers around their session.
#[derive(Clone, Default)]
pub struct InputHooks {
    inner: Arc<Mutex<Registry>>,
}

impl InputHooks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a key-down handler, returning its id.
    pub fn on_key_down(&self, handler: impl FnMut(KeyEvent) + Send + 'static) -> HandlerId {
        let mut registry = self.inner.lock().unwrap();
        let id = registry.next();
        registry.keys.push((id, Box::new(handler)));
        id
    }

    /// Attach a pointer-move handler, returning its id.
    pub fn on_pointer_move(&self, handler: impl FnMut(i32, i32) + Send + 'static) -> HandlerId {
        let mut registry = self.inner.lock().unwrap();
        let id = registry.next();
        registry.pointers.push((id, Box::new(handler)));
        id
    }

    /// Detach a previously registered handler. Unknown ids are ignored.
    pub fn remove(&self, id: HandlerId) {
        let mut registry = self.inner.lock().unwrap();
        registry.keys.retain(|(hid, _)| *hid != id);
        registry.pointers.retain(|(hid, _)| *hid != id);
    }

    /// Invoke every key-down handler with `event`.
    pub fn emit_key(&self, event: KeyEvent) {
        let mut registry = self.inner.lock().unwrap();
        for (_, handler) in registry.keys.iter_mut() {
            handler(event);
        }
    }

    /// Invoke every pointer-move handler with the cell coordinates.
    pub fn emit_pointer(&self, x: i32, y: i32) {
        let mut registry = self.inner.lock().unwrap();
        for (_, handler) in registry.pointers.iter_mut() {
            handler(x, y);
        }
    }

    /// Number of registered handlers across both streams.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        let registry = self.inner.lock().unwrap();
        registry.keys.len() + registry.pointers.len()
    }
}

enum QueuedInput {
    Key(KeyEvent),
    Pointer(i32, i32),
}

/// An in-memory surface for deterministic tests.
///
/// Holds a character grid, records every cell write, and replays scripted
/// input through the handler hooks on [`poll`](Surface::poll). Input is
/// scripted in batches: one batch is delivered per poll, and
/// [`then`](TestSurface::then) starts a new batch for a later poll. No IO.
pub struct TestSurface {
    width: i32,
    height: i32,
    cells: Vec<(char, Color, Color)>,
    writes: Vec<(i32, i32, char)>,
    queued: std::collections::VecDeque<Vec<QueuedInput>>,
    hooks: InputHooks,
    close: bool,
    presented: usize,
}

impl TestSurface {
    /// Create a surface of the given size, filled with spaces.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0, "test surface width must be > 0");
        assert!(height > 0, "test surface height must be > 0");
        let blank = (' ', Color::DEFAULT_FOREGROUND, Color::DEFAULT_BACKGROUND);
        Self {
            width,
            height,
            cells: vec![blank; (width * height) as usize],
            writes: Vec::new(),
            queued: std::collections::VecDeque::new(),
            hooks: InputHooks::new(),
            close: false,
            presented: 0,
        }
    }

    fn current_batch(&mut self) -> &mut Vec<QueuedInput> {
        if self.queued.is_empty() {
            self.queued.push_back(Vec::new());
        }
        self.queued.back_mut().unwrap()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// The character currently at `(x, y)`, or space when out of bounds.
    #[must_use]
    pub fn char_at(&self, x: i32, y: i32) -> char {
        self.index(x, y).map_or(' ', |i| self.cells[i].0)
    }

    /// Foreground and background currently at `(x, y)`.
    #[must_use]
    pub fn colors_at(&self, x: i32, y: i32) -> (Color, Color) {
        self.index(x, y)
            .map_or((Color::DEFAULT_FOREGROUND, Color::DEFAULT_BACKGROUND), |i| {
                (self.cells[i].1, self.cells[i].2)
            })
    }

    /// One row of the grid as a string.
    #[must_use]
    pub fn row_text(&self, y: i32) -> String {
        (0..self.width).map(|x| self.char_at(x, y)).collect()
    }

    /// Drain and return the log of cell writes since the last call.
    pub fn take_writes(&mut self) -> Vec<(i32, i32, char)> {
        std::mem::take(&mut self.writes)
    }

    /// Queue a key press into the current input batch.
    pub fn press(&mut self, key: KeyEvent) {
        self.current_batch().push(QueuedInput::Key(key));
    }

    /// Queue a pointer move into the current input batch.
    pub fn move_pointer(&mut self, x: i32, y: i32) {
        self.current_batch().push(QueuedInput::Pointer(x, y));
    }

    /// Close the current input batch: later input is delivered one poll
    /// after this batch. Calling this first scripts an input-free poll.
    pub fn then(&mut self) {
        if self.queued.is_empty() {
            self.queued.push_back(Vec::new());
        }
        self.queued.push_back(Vec::new());
    }

    /// Raise the close-request flag.
    pub fn request_close(&mut self) {
        self.close = true;
    }

    /// Resize the grid, clearing it.
    pub fn resize(&mut self, width: i32, height: i32) {
        assert!(width > 0 && height > 0, "test surface size must be > 0");
        let blank = (' ', Color::DEFAULT_FOREGROUND, Color::DEFAULT_BACKGROUND);
        self.width = width;
        self.height = height;
        self.cells = vec![blank; (width * height) as usize];
    }

    /// How many times `present` has been called.
    #[must_use]
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl Surface for TestSurface {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn should_close(&self) -> bool {
        self.close
    }

    fn set(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        self.writes.push((x, y, ch));
        if let Some(i) = self.index(x, y) {
            self.cells[i] = (ch, fg, bg);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }

    fn poll(&mut self) -> io::Result<()> {
        if let Some(batch) = self.queued.pop_front() {
            for input in batch {
                match input {
                    QueuedInput::Key(key) => self.hooks.emit_key(key),
                    QueuedInput::Pointer(x, y) => self.hooks.emit_pointer(x, y),
                }
            }
        }
        Ok(())
    }

    fn hooks(&self) -> InputHooks {
        self.hooks.clone()
    }
}
