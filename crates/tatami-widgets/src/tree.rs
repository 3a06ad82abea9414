#![forbid(unsafe_code)]

//! The widget tree.
//!
//! A [`Widget`] is one node of a declarative UI tree: a closed set of
//! variants ([`Kind`]) sharing a parent-relative position, a resolved
//! geometry, inherited colors, and a content hash used by the reconciler
//! to decide whether a node's own state changed between frames.
//!
//! Trees are cheap, throwaway values: the view function builds a fresh one
//! every frame, the reconciler diffs it against the previous frame's tree,
//! and the old tree is dropped. Children are exclusively owned, so there is
//! no sharing and no cycles by construction.
//!
//! `position` and `geometry` are only meaningful after
//! [`layout`](Widget::layout) has run for the current frame's constraint.

use std::fmt::Write as _;
use std::hash::{DefaultHasher, Hash, Hasher};

use tatami_core::color::Color;
use tatami_core::geometry::{Geometry, Position};
use tatami_core::surface::Surface;

use crate::draw;

/// One node of the widget tree.
#[derive(Debug)]
pub struct Widget {
    pub(crate) kind: Kind,
    pub(crate) position: Position,
    pub(crate) geometry: Geometry,
    pub(crate) foreground: Color,
    pub(crate) background: Color,
    pub(crate) state_hash: u64,
}

/// The closed set of widget variants, one case per layout behavior.
#[derive(Debug)]
pub(crate) enum Kind {
    /// A box with a fixed width, clamped into the constraint.
    FixedWidth {
        width: i32,
        child: Option<Box<Widget>>,
    },
    /// A box with a fixed height, clamped into the constraint.
    FixedHeight {
        height: i32,
        child: Option<Box<Widget>>,
    },
    /// A box that claims all remaining width in a `Row`.
    FillWidth { child: Option<Box<Widget>> },
    /// A box that claims all remaining height in a `Column`.
    FillHeight { child: Option<Box<Widget>> },
    /// A horizontal container.
    Row {
        reversed: bool,
        children: Vec<Widget>,
    },
    /// A vertical container.
    Column {
        reversed: bool,
        children: Vec<Widget>,
    },
    /// A text leaf.
    Text { lines: Vec<String> },
    /// A one-cell box outline around its child.
    Border { child: Option<Box<Widget>> },
    /// A solid fill of its own area behind its child.
    Pane { child: Option<Box<Widget>> },
    /// Sets the inherited foreground for its subtree.
    Foreground {
        color: Color,
        child: Option<Box<Widget>>,
    },
    /// Sets the inherited background for its subtree.
    Background {
        color: Color,
        child: Option<Box<Widget>>,
    },
}

fn hash_one(value: impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl Widget {
    fn new(kind: Kind, state_hash: u64) -> Self {
        Self {
            kind,
            position: Position::ZERO,
            geometry: Geometry::default(),
            foreground: Color::DEFAULT_FOREGROUND,
            background: Color::DEFAULT_BACKGROUND,
            state_hash,
        }
    }

    /// Parent-relative position, written by the parent's layout pass.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Resolved size, written by this node's own layout pass.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Resolved foreground color after inheritance.
    #[must_use]
    pub fn foreground(&self) -> Color {
        self.foreground
    }

    /// Resolved background color after inheritance.
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Content hash summarizing this node's non-structural state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        self.state_hash
    }

    /// The variant name, for tree dumps and diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            Kind::FixedWidth { .. } => "FixedWidth",
            Kind::FixedHeight { .. } => "FixedHeight",
            Kind::FillWidth { .. } => "FillWidth",
            Kind::FillHeight { .. } => "FillHeight",
            Kind::Row { .. } => "Row",
            Kind::Column { .. } => "Column",
            Kind::Text { .. } => "Text",
            Kind::Border { .. } => "Border",
            Kind::Pane { .. } => "Pane",
            Kind::Foreground { .. } => "Foreground",
            Kind::Background { .. } => "Background",
        }
    }

    /// This node's children in visit order.
    pub fn children(&self) -> std::slice::Iter<'_, Widget> {
        match &self.kind {
            Kind::Row { children, .. } | Kind::Column { children, .. } => children.iter(),
            Kind::FixedWidth { child, .. }
            | Kind::FixedHeight { child, .. }
            | Kind::FillWidth { child }
            | Kind::FillHeight { child }
            | Kind::Border { child }
            | Kind::Pane { child }
            | Kind::Foreground { child, .. }
            | Kind::Background { child, .. } => match child {
                Some(c) => std::slice::from_ref(&**c).iter(),
                None => [].iter(),
            },
            Kind::Text { .. } => [].iter(),
        }
    }

    /// Render only this node (not its subtree) at absolute `(x, y)`.
    ///
    /// Most variants draw nothing themselves; `Text`, `Border`, and `Pane`
    /// write cells with the node's resolved colors.
    pub fn render(&self, surface: &mut dyn Surface, x: i32, y: i32) {
        match &self.kind {
            Kind::Text { lines } => {
                for (row, line) in lines.iter().enumerate() {
                    draw::text_line(
                        surface,
                        x,
                        y + row as i32,
                        line,
                        self.foreground,
                        self.background,
                    );
                }
            }
            Kind::Border { .. } => {
                draw::box_outline(
                    surface,
                    x,
                    y,
                    self.geometry.w,
                    self.geometry.h,
                    self.foreground,
                    self.background,
                );
            }
            Kind::Pane { .. } => {
                draw::fill(
                    surface,
                    x,
                    y,
                    self.geometry.w,
                    self.geometry.h,
                    ' ',
                    self.foreground,
                    self.background,
                );
            }
            _ => {}
        }
    }
}

/// Depth-first iterator over `(node, depth)` pairs, parent before children.
pub struct TreeIter<'a> {
    stack: Vec<(&'a Widget, usize)>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (&'a Widget, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}

/// Walk a tree depth-first, yielding each node with its depth.
pub fn visit_tree(root: &Widget) -> TreeIter<'_> {
    TreeIter {
        stack: vec![(root, 0)],
    }
}

/// Dump a laid-out tree as indented `Kind x,y WxH` lines with absolute
/// coordinates. Intended for tracing and test failure output.
#[must_use]
pub fn format_tree(root: &Widget) -> String {
    fn walk(node: &Widget, depth: usize, x: i32, y: i32, out: &mut String) {
        let x = x + node.position.x;
        let y = y + node.position.y;
        let g = node.geometry;
        let _ = writeln!(
            out,
            "{:indent$}{} {},{} {}x{}",
            "",
            node.kind_name(),
            x,
            y,
            g.w,
            g.h,
            indent = depth * 2,
        );
        for child in node.children() {
            walk(child, depth + 1, x, y, out);
        }
    }

    let mut out = String::new();
    walk(root, 0, 0, 0, &mut out);
    out
}

fn boxed(child: Option<Widget>) -> Option<Box<Widget>> {
    child.map(Box::new)
}

/// A box whose width is fixed (clamped into the constraint).
#[must_use]
pub fn fixed_width(width: i32, child: Option<Widget>) -> Widget {
    Widget::new(
        Kind::FixedWidth {
            width,
            child: boxed(child),
        },
        hash_one(width),
    )
}

/// A box whose height is fixed (clamped into the constraint).
#[must_use]
pub fn fixed_height(height: i32, child: Option<Widget>) -> Widget {
    Widget::new(
        Kind::FixedHeight {
            height,
            child: boxed(child),
        },
        hash_one(height),
    )
}

/// A box that consumes all remaining width in a row.
#[must_use]
pub fn fill_width(child: Option<Widget>) -> Widget {
    Widget::new(Kind::FillWidth { child: boxed(child) }, 0)
}

/// A box that consumes all remaining height in a column.
#[must_use]
pub fn fill_height(child: Option<Widget>) -> Widget {
    Widget::new(Kind::FillHeight { child: boxed(child) }, 0)
}

/// A left-to-right container.
#[must_use]
pub fn row(children: Vec<Widget>) -> Widget {
    Widget::new(
        Kind::Row {
            reversed: false,
            children,
        },
        hash_one(false),
    )
}

/// A right-to-left container.
#[must_use]
pub fn row_reversed(children: Vec<Widget>) -> Widget {
    Widget::new(
        Kind::Row {
            reversed: true,
            children,
        },
        hash_one(true),
    )
}

/// A top-to-bottom container.
#[must_use]
pub fn column(children: Vec<Widget>) -> Widget {
    Widget::new(
        Kind::Column {
            reversed: false,
            children,
        },
        hash_one(false),
    )
}

/// A bottom-to-top container.
#[must_use]
pub fn column_reversed(children: Vec<Widget>) -> Widget {
    Widget::new(
        Kind::Column {
            reversed: true,
            children,
        },
        hash_one(true),
    )
}

/// A text leaf. Newlines split the text into lines.
#[must_use]
pub fn text(content: impl AsRef<str>) -> Widget {
    let content = content.as_ref();
    let lines = content.split('\n').map(str::to_owned).collect();
    Widget::new(Kind::Text { lines }, hash_one(content))
}

/// A one-cell box outline around its child.
#[must_use]
pub fn border(child: Option<Widget>) -> Widget {
    Widget::new(Kind::Border { child: boxed(child) }, 0)
}

/// A solid fill of its own area behind its child.
#[must_use]
pub fn pane(child: Option<Widget>) -> Widget {
    Widget::new(Kind::Pane { child: boxed(child) }, 0)
}

/// Sets the inherited foreground color for its subtree.
#[must_use]
pub fn foreground(color: Color, child: Option<Widget>) -> Widget {
    Widget::new(
        Kind::Foreground {
            color,
            child: boxed(child),
        },
        hash_one(color.as_u8()),
    )
}

/// Sets the inherited background color for its subtree.
#[must_use]
pub fn background(color: Color, child: Option<Widget>) -> Widget {
    Widget::new(
        Kind::Background {
            color,
            child: boxed(child),
        },
        hash_one(color.as_u8()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatami_core::geometry::Constraint;

    #[test]
    fn children_of_leaf_is_empty() {
        let t = text("hi");
        assert_eq!(t.children().count(), 0);
    }

    #[test]
    fn children_of_single_child_widgets() {
        let b = border(Some(text("x")));
        assert_eq!(b.children().count(), 1);

        let empty = border(None);
        assert_eq!(empty.children().count(), 0);
    }

    #[test]
    fn children_of_containers_keep_order() {
        let r = row(vec![text("a"), text("b"), text("c")]);
        let names: Vec<_> = r.children().map(|c| c.kind_name()).collect();
        assert_eq!(names, vec!["Text", "Text", "Text"]);
    }

    #[test]
    fn text_hash_tracks_content() {
        assert_eq!(text("same").state_hash(), text("same").state_hash());
        assert_ne!(text("one").state_hash(), text("two").state_hash());
    }

    #[test]
    fn multiline_text_hash_differs_from_joined() {
        // "a\nb" and "ab" must not collide even though both have two chars.
        assert_ne!(text("a\nb").state_hash(), text("ab").state_hash());
    }

    #[test]
    fn color_decorator_hash_tracks_color() {
        let red = foreground(Color::Red, None);
        let blue = foreground(Color::Blue, None);
        assert_ne!(red.state_hash(), blue.state_hash());
    }

    #[test]
    fn reversed_flag_changes_container_hash() {
        let forward = row(vec![]);
        let backward = row_reversed(vec![]);
        assert_ne!(forward.state_hash(), backward.state_hash());
    }

    #[test]
    fn visit_tree_is_depth_first() {
        let tree = row(vec![border(Some(text("a"))), text("b")]);
        let names: Vec<_> = visit_tree(&tree)
            .map(|(w, d)| (w.kind_name(), d))
            .collect();
        assert_eq!(
            names,
            vec![("Row", 0), ("Border", 1), ("Text", 2), ("Text", 1)]
        );
    }

    #[test]
    fn format_tree_reports_absolute_positions() {
        let mut tree = row(vec![text("ab"), text("cd")]);
        tree.layout(Constraint::loose(20, 5));
        let dump = format_tree(&tree);
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines[0], "Row 0,0 4x1");
        assert_eq!(lines[1], "  Text 0,0 2x1");
        assert_eq!(lines[2], "  Text 2,0 2x1");
    }
}
