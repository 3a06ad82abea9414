#![forbid(unsafe_code)]

//! Widget tree, constraint layout, and the reconciler.
//!
//! A view function builds a [`Widget`] tree each frame; [`Widget::layout`]
//! resolves sizes and positions against a [`Constraint`]; [`render_tree`]
//! and [`render_diff`] bring the terminal surface up to date.
//!
//! # Example
//!
//! ```
//! use tatami_core::geometry::Constraint;
//! use tatami_widgets::{border, fill_width, row, text};
//!
//! let mut tree = row(vec![
//!     text("hello"),
//!     fill_width(None),
//!     border(Some(text("world"))),
//! ]);
//! let geometry = tree.layout(Constraint::loose(50, 20));
//! assert_eq!(geometry.w, 50);
//! ```

mod draw;
mod layout;
mod render;
mod tree;

pub use render::{render_diff, render_tree};
pub use tree::{
    TreeIter, Widget, background, border, column, column_reversed, fill_height, fill_width,
    fixed_height, fixed_width, foreground, format_tree, pane, row, row_reversed, text, visit_tree,
};

// Re-export the geometry types that appear in this crate's public API.
pub use tatami_core::geometry::{Constraint, Geometry, Position};
