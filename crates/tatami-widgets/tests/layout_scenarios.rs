//! End-to-end layout and reconcile scenarios: a view function rebuilding a
//! full-screen tree each frame, diffed against the previous frame.

use tatami_core::geometry::Constraint;
use tatami_core::surface::TestSurface;
use tatami_widgets::{
    Widget, border, column, fill_height, fill_width, fixed_width, render_diff, render_tree, row,
    text,
};

/// A map-and-sidebar screen: flexible map pane, fixed-width roster.
fn screen(roster: &[(&str, &str)]) -> Widget {
    let lines = roster
        .iter()
        .map(|(name, mood)| row(vec![text(*name), fill_width(None), text(*mood)]))
        .collect();
    row(vec![
        fill_width(Some(fill_height(Some(border(None))))),
        fixed_width(20, Some(column(lines))),
    ])
}

#[test]
fn full_screen_layout_fills_the_terminal() {
    let mut tree = screen(&[
        ("Blacksmith", "friendly"),
        ("Mouse", "neutral"),
        ("Fire Imp", "hostile"),
    ]);
    let g = tree.layout(Constraint::loose(50, 20));
    assert_eq!((g.w, g.h), (50, 20));

    let map = tree.children().next().unwrap();
    assert_eq!(map.geometry().w, 30);
    assert_eq!(map.geometry().h, 20);

    let sidebar = tree.children().nth(1).unwrap();
    assert_eq!(sidebar.position().x, 30);
    assert_eq!(sidebar.geometry().w, 20);
}

/// Cells `[from, to)` of one surface row as a string.
fn cells(surface: &TestSurface, y: i32, from: i32, to: i32) -> String {
    (from..to).map(|x| surface.char_at(x, y)).collect()
}

#[test]
fn rendered_screen_has_justified_sidebar_rows() {
    let mut tree = screen(&[("Blacksmith", "friendly"), ("Mouse", "neutral")]);
    tree.layout(Constraint::loose(50, 10));

    let mut surface = TestSurface::new(50, 10);
    render_tree(&mut surface, &tree);

    // Name left-justified, mood right-justified inside the 20-cell sidebar.
    assert_eq!(cells(&surface, 0, 30, 50), "Blacksmith  friendly");
    assert_eq!(cells(&surface, 1, 30, 35), "Mouse");
    assert_eq!(cells(&surface, 1, 43, 50), "neutral");
    // The map pane's border spans the left region.
    assert_eq!(surface.char_at(0, 0), '┌');
    assert_eq!(surface.char_at(29, 0), '┐');
    assert_eq!(surface.char_at(0, 9), '└');
}

#[test]
fn frame_over_frame_diff_touches_only_the_changed_row() {
    let constraint = Constraint::loose(50, 10);
    let mut prev = screen(&[("Blacksmith", "friendly"), ("Mouse", "neutral")]);
    prev.layout(constraint);

    let mut surface = TestSurface::new(50, 10);
    render_tree(&mut surface, &prev);
    surface.take_writes();

    // Next frame: the mouse turns hostile. Same structure, same geometry
    // (both moods are seven characters), one changed leaf.
    let mut next = screen(&[("Blacksmith", "friendly"), ("Mouse", "hostile")]);
    next.layout(constraint);
    render_diff(&mut surface, &prev, &next);

    let writes = surface.take_writes();
    assert!(!writes.is_empty());
    assert!(
        writes.iter().all(|(x, y, _)| *y == 1 && *x >= 43),
        "only the mood cell block may change: {writes:?}"
    );
    assert_eq!(cells(&surface, 1, 43, 50), "hostile");
}

#[test]
fn resize_relayout_changes_flexible_split_only() {
    let mut tree = screen(&[("Mouse", "neutral")]);
    let g = tree.layout(Constraint::loose(80, 24));
    assert_eq!((g.w, g.h), (80, 24));
    assert_eq!(tree.children().next().unwrap().geometry().w, 60);

    // Narrower terminal: the map pane absorbs the entire change.
    let g = tree.layout(Constraint::loose(44, 12));
    assert_eq!((g.w, g.h), (44, 12));
    assert_eq!(tree.children().next().unwrap().geometry().w, 24);
    assert_eq!(tree.children().nth(1).unwrap().geometry().w, 20);
}
