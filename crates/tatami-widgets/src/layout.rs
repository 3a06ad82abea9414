#![forbid(unsafe_code)]

//! Constraint layout.
//!
//! Layout resolves a widget tree against a [`Constraint`] top-down: each
//! node clamps or claims space per its variant, writes its own `geometry`,
//! and writes each child's `position`. Inherited colors travel down as an
//! explicit [`Inherited`] context so a node's layout can run any number of
//! times without order-of-evaluation surprises.
//!
//! Containers distribute the primary axis in two passes: inflexible
//! children first, each offered the budget left by its predecessors, then
//! the remaining space split among flexible children by integer division
//! with the remainder topped onto the last shares — the children's extents
//! always sum exactly to the remaining space, even when it does not divide
//! evenly.
//!
//! Out-of-range constraints (`x_min > x_max`, negative bounds) are not
//! validated; the arithmetic clamps deterministically and layout never
//! fails.

use tatami_core::color::Color;
use tatami_core::geometry::{Constraint, Geometry, Position};
use unicode_width::UnicodeWidthStr;

use crate::tree::{Kind, Widget};

/// Colors inherited from ancestor decorators, threaded through layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Inherited {
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Inherited {
    fn default() -> Self {
        Self {
            fg: Color::DEFAULT_FOREGROUND,
            bg: Color::DEFAULT_BACKGROUND,
        }
    }
}

impl Widget {
    /// Lay out this tree against `constraint`, returning the resolved size.
    ///
    /// After this returns, every node in the tree has a valid `geometry`
    /// and every child a valid `position` for the current frame.
    pub fn layout(&mut self, constraint: Constraint) -> Geometry {
        self.layout_with(constraint, Inherited::default())
    }

    pub(crate) fn layout_with(&mut self, c: Constraint, inherited: Inherited) -> Geometry {
        // Color decorators override the context before it settles on this
        // node; every other variant just takes what its ancestors gave it.
        let inherited = match &self.kind {
            Kind::Foreground { color, .. } => Inherited {
                fg: *color,
                ..inherited
            },
            Kind::Background { color, .. } => Inherited {
                bg: *color,
                ..inherited
            },
            _ => inherited,
        };
        self.foreground = inherited.fg;
        self.background = inherited.bg;

        let geometry = match &mut self.kind {
            Kind::FixedWidth { width, child } => {
                let w = c.clamp_x(*width);
                match child {
                    None => Geometry::new(w, c.y_min),
                    Some(child) => {
                        child.position = Position::ZERO;
                        child.layout_with(c.with_x(w, w), inherited)
                    }
                }
            }
            Kind::FixedHeight { height, child } => {
                let h = c.clamp_y(*height);
                match child {
                    None => Geometry::new(c.x_min, h),
                    Some(child) => {
                        child.position = Position::ZERO;
                        child.layout_with(c.with_y(h, h), inherited)
                    }
                }
            }
            Kind::FillWidth { child } => match child {
                None => Geometry::new(c.x_max, c.y_min),
                Some(child) => {
                    child.position = Position::ZERO;
                    child.layout_with(c.with_x(c.x_max, c.x_max), inherited)
                }
            },
            Kind::FillHeight { child } => match child {
                None => Geometry::new(c.x_min, c.y_max),
                Some(child) => {
                    child.position = Position::ZERO;
                    child.layout_with(c.with_y(c.y_max, c.y_max), inherited)
                }
            },
            Kind::Row { reversed, children } => layout_row(children, *reversed, c, inherited),
            Kind::Column { reversed, children } => layout_column(children, *reversed, c, inherited),
            Kind::Text { lines } => {
                let widest = lines
                    .iter()
                    .map(|line| UnicodeWidthStr::width(line.as_str()) as i32)
                    .max()
                    .unwrap_or(0);
                Geometry::new(c.clamp_x(widest), c.clamp_y(lines.len() as i32))
            }
            Kind::Border { child } => match child {
                None => Geometry::new(c.x_min, c.y_min),
                Some(child) => {
                    child.position = Position::new(1, 1);
                    let inner = child.layout_with(
                        Constraint {
                            x_max: c.x_max - 2,
                            y_max: c.y_max - 2,
                            ..c
                        },
                        inherited,
                    );
                    Geometry::new(inner.w + 2, inner.h + 2)
                }
            },
            Kind::Pane { child }
            | Kind::Foreground { child, .. }
            | Kind::Background { child, .. } => match child {
                None => Geometry::new(c.x_min, c.y_min),
                Some(child) => {
                    child.position = Position::ZERO;
                    child.layout_with(c, inherited)
                }
            },
        };

        self.geometry = geometry;
        geometry
    }

    fn is_fill_width(&self) -> bool {
        matches!(self.kind, Kind::FillWidth { .. })
    }

    fn is_fill_height(&self) -> bool {
        matches!(self.kind, Kind::FillHeight { .. })
    }
}

fn layout_row(
    children: &mut [Widget],
    reversed: bool,
    c: Constraint,
    inherited: Inherited,
) -> Geometry {
    if children.is_empty() {
        return Geometry::new(c.x_min, c.y_min);
    }

    // Inflexible children first, each offered the width its predecessors
    // left behind.
    let mut width = 0;
    for child in children.iter_mut().filter(|w| !w.is_fill_width()) {
        let g = child.layout_with(c.with_x(0, c.x_max - width), inherited);
        width += g.w;
    }

    // Flexible children split the remaining width. Integer division leaves
    // a remainder; whenever the running remainder would drop below the next
    // share, that share absorbs it, so the shares sum exactly.
    let flexible = children.iter().filter(|w| w.is_fill_width()).count() as i32;
    if flexible > 0 {
        let mut remaining = c.x_max - width;
        let mut per_child = remaining / flexible;
        for child in children.iter_mut().filter(|w| w.is_fill_width()) {
            remaining -= per_child;
            if remaining < per_child {
                per_child += remaining;
            }
            let g = child.layout_with(c.with_x(0, per_child), inherited);
            width += g.w;
        }
    }

    let mut x = 0;
    let mut height = 0;
    for child in children.iter_mut() {
        let g = child.geometry;
        if g.h > height {
            height = g.h;
        }
        let cx = if reversed { width - x - g.w } else { x };
        child.position = Position::new(cx, 0);
        x += g.w;
    }

    Geometry::new(width, height)
}

fn layout_column(
    children: &mut [Widget],
    reversed: bool,
    c: Constraint,
    inherited: Inherited,
) -> Geometry {
    if children.is_empty() {
        return Geometry::new(c.x_min, c.y_min);
    }

    let mut height = 0;
    for child in children.iter_mut().filter(|w| !w.is_fill_height()) {
        let g = child.layout_with(c.with_y(0, c.y_max - height), inherited);
        height += g.h;
    }

    let flexible = children.iter().filter(|w| w.is_fill_height()).count() as i32;
    if flexible > 0 {
        let mut remaining = c.y_max - height;
        let mut per_child = remaining / flexible;
        for child in children.iter_mut().filter(|w| w.is_fill_height()) {
            remaining -= per_child;
            if remaining < per_child {
                per_child += remaining;
            }
            let g = child.layout_with(c.with_y(0, per_child), inherited);
            height += g.h;
        }
    }

    let mut y = 0;
    let mut width = 0;
    for child in children.iter_mut() {
        let g = child.geometry;
        if g.w > width {
            width = g.w;
        }
        let cy = if reversed { height - y - g.h } else { y };
        child.position = Position::new(0, cy);
        y += g.h;
    }

    Geometry::new(width, height)
}
