#![forbid(unsafe_code)]

//! Core: geometry value types, colors, input events, and the terminal
//! surface contract.
//!
//! Everything in this crate is backend-agnostic except [`term`], which
//! provides the crossterm-backed [`term::TermSurface`]. Tests and headless
//! runs use [`surface::TestSurface`] instead.

pub mod color;
pub mod event;
pub mod geometry;
pub mod surface;

#[cfg(not(target_arch = "wasm32"))]
pub mod term;

pub use color::Color;
pub use event::{KeyCode, KeyEvent, Modifiers};
pub use geometry::{Constraint, Geometry, Position, clamp};
pub use surface::{HandlerId, InputHooks, Surface, TestSurface};

#[cfg(not(target_arch = "wasm32"))]
pub use term::{TermOptions, TermSurface};
