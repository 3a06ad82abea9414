#![forbid(unsafe_code)]

//! Tree rendering and the reconciler.
//!
//! [`render_tree`] draws a laid-out tree in full. [`render_diff`] compares
//! the previous frame's tree against the next one and touches only the
//! screen regions that changed.
//!
//! # Algorithm
//!
//! The diff is structural and positional: children are matched pairwise by
//! index, never by key. A node pair is *changed* when the variant, the
//! parent-relative position, the resolved geometry, or the content hash
//! differs. A changed node has its previous rectangle blanked and its new
//! subtree rendered in full; an unchanged node recurses into its children,
//! blanking surplus previous children and fully rendering surplus new ones.
//! Absolute coordinates accumulate by summing parent positions down the
//! recursion. Diffing never fails; a root variant mismatch simply
//! degenerates to blank-everything-and-redraw.
//!
//! Positional matching is only correct when the view function keeps trees
//! structurally stable across frames for nodes whose identity matters —
//! that is the documented contract for callers.

use std::mem::discriminant;

use tatami_core::color::Color;
use tatami_core::surface::Surface;

use crate::draw;
use crate::tree::Widget;

/// Render `node`'s entire subtree at the surface origin.
pub fn render_tree(surface: &mut dyn Surface, node: &Widget) {
    render_sub_tree(surface, node, 0, 0);
}

/// Render a subtree with its parent's absolute origin at `(x, y)`.
fn render_sub_tree(surface: &mut dyn Surface, node: &Widget, x: i32, y: i32) {
    let x = x + node.position().x;
    let y = y + node.position().y;
    node.render(surface, x, y);
    for child in node.children() {
        render_sub_tree(surface, child, x, y);
    }
}

/// Update the surface from `prev` to `next`, redrawing only what changed.
///
/// Both trees must already be laid out. On the first frame (no previous
/// tree) use [`render_tree`] instead.
pub fn render_diff(surface: &mut dyn Surface, prev: &Widget, next: &Widget) {
    diff_sub_tree(surface, prev, next, 0, 0);
}

fn changed(prev: &Widget, next: &Widget) -> bool {
    discriminant(&prev.kind) != discriminant(&next.kind)
        || prev.position() != next.position()
        || prev.geometry() != next.geometry()
        || prev.state_hash() != next.state_hash()
}

fn diff_sub_tree(surface: &mut dyn Surface, prev: &Widget, next: &Widget, x: i32, y: i32) {
    if changed(prev, next) {
        clear_sub_tree(surface, prev, x, y);
        render_sub_tree(surface, next, x, y);
        return;
    }

    // Unchanged node: the pair occupies the same cells, so only descend.
    // prev.position == next.position here, so either offsets the children.
    let x = x + next.position().x;
    let y = y + next.position().y;
    let mut prev_children = prev.children();
    let mut next_children = next.children();
    loop {
        match (prev_children.next(), next_children.next()) {
            (Some(p), Some(n)) => diff_sub_tree(surface, p, n, x, y),
            (Some(p), None) => clear_sub_tree(surface, p, x, y),
            (None, Some(n)) => render_sub_tree(surface, n, x, y),
            (None, None) => break,
        }
    }
}

/// Blank a node's rectangle with the default colors.
fn clear_sub_tree(surface: &mut dyn Surface, node: &Widget, x: i32, y: i32) {
    let g = node.geometry();
    if g.is_empty() {
        return;
    }
    let x = x + node.position().x;
    let y = y + node.position().y;
    draw::fill(
        surface,
        x,
        y,
        g.w,
        g.h,
        ' ',
        Color::DEFAULT_FOREGROUND,
        Color::DEFAULT_BACKGROUND,
    );
}
