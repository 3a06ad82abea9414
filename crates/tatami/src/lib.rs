#![forbid(unsafe_code)]

//! tatami public facade crate.
//!
//! This crate provides the stable surface area for users. It re-exports
//! the widget constructors, layout types, and runtime from the internal
//! crates and offers a lightweight prelude for day-to-day usage.
//!
//! # Example
//!
//! ```no_run
//! use tatami::prelude::*;
//!
//! #[derive(Clone, PartialEq)]
//! struct Counter(i32);
//!
//! #[derive(Clone)]
//! enum Msg {
//!     Key(KeyEvent),
//! }
//!
//! fn step(state: &Counter, msg: Msg) -> (Counter, Cmd<Msg>) {
//!     match msg {
//!         Msg::Key(k) if k.is_char('q') => (state.clone(), Cmd::quit()),
//!         Msg::Key(k) if k.is_char('+') => (Counter(state.0 + 1), Cmd::none()),
//!         _ => (state.clone(), Cmd::none()),
//!     }
//! }
//!
//! fn subs(surface: &TermSurface) -> Box<dyn Subscription<Msg>> {
//!     Box::new(KeyDown::new(surface.hooks(), Msg::Key))
//! }
//!
//! fn main() -> std::io::Result<()> {
//!     tatami::run_terminal(
//!         80,
//!         24,
//!         "counter",
//!         || Counter(0),
//!         subs,
//!         step,
//!         |state| border(Some(text(format!("count: {} (+/q)", state.0)))),
//!     )
//! }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tatami_core::color::Color;
pub use tatami_core::event::{KeyCode, KeyEvent, Modifiers};
pub use tatami_core::geometry::{Constraint, Geometry, Position, clamp};
pub use tatami_core::surface::{HandlerId, InputHooks, Surface, TestSurface};

#[cfg(not(target_arch = "wasm32"))]
pub use tatami_core::term::{TermOptions, TermSurface};

// --- Widget re-exports -----------------------------------------------------

pub use tatami_widgets::{
    TreeIter, Widget, background, border, column, column_reversed, fill_height, fill_width,
    fixed_height, fixed_width, foreground, format_tree, pane, render_diff, render_tree, row,
    row_reversed, text, visit_tree,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tatami_runtime::{
    Cmd, Dispatch, Every, History, KeyDown, Many, PointerMove, Store, SubscriberId, Subscription,
    run,
};

#[cfg(not(target_arch = "wasm32"))]
pub use tatami_runtime::run_terminal;

// --- Errors ----------------------------------------------------------------

/// Top-level error type for tatami apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure during terminal operations.
    Io(std::io::Error),
    /// Terminal or runtime error with message.
    Terminal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Terminal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for tatami APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ----------------------------------------------------------------

pub mod prelude {
    //! Commonly used items, importable in one line.

    pub use crate::{
        Cmd, Color, Constraint, Dispatch, Error, Every, Geometry, KeyCode, KeyDown, KeyEvent, Many,
        Modifiers, PointerMove, Result, Store, Subscription, Surface, Widget, background, border,
        column, column_reversed, fill_height, fill_width, fixed_height, fixed_width, foreground,
        pane, row, row_reversed, text,
    };

    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::{TermOptions, TermSurface, run_terminal};
}
