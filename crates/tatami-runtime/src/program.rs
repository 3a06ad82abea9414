#![forbid(unsafe_code)]

//! The frame loop: binding store output to layout and the reconciler.
//!
//! Each iteration drains ready input from the surface, lets the store drain
//! its queue, and performs at most one redraw. A redraw happens when the
//! drained state changed by value or the surface dimensions changed; the
//! view function then rebuilds the widget tree from current state, layout
//! resolves it against the surface size, and the reconciler updates the
//! screen — a full render on the first frame, an incremental diff after.
//!
//! The loop ends when a quit command fires or the surface reports a close
//! request. Quit is observed only after the drain pass that produced it and
//! after its redraw, so the last frame on screen always reflects the true
//! final state.

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use tracing::{debug, trace};

use tatami_core::geometry::Constraint;
use tatami_core::surface::Surface;
use tatami_widgets::{Widget, format_tree, render_diff, render_tree};

use crate::cmd::Cmd;
use crate::store::Store;
use crate::subscription::Subscription;

/// Run an application to completion on the given surface.
///
/// - `init` produces the initial state.
/// - `subscriptions` builds the input sources, given the surface (use
///   [`Surface::hooks`] for key/pointer bindings). They are started before
///   the first frame and stopped when the loop exits.
/// - `reducer` is the pure state transition: `(state, event)` to
///   `(new state, command)`.
/// - `view` builds a widget tree from state; it runs once per drawn frame.
///
/// Blocks until the reducer returns [`Cmd::Quit`] or the surface requests
/// close. Reducer panics propagate.
pub fn run<T, S, E, I, B, R, V>(
    surface: &mut T,
    init: I,
    subscriptions: B,
    reducer: R,
    view: V,
) -> io::Result<()>
where
    T: Surface,
    S: Clone + PartialEq + 'static,
    E: Clone + Send + 'static,
    I: FnOnce() -> S,
    B: FnOnce(&T) -> Box<dyn Subscription<E>>,
    R: Fn(&S, E) -> (S, Cmd<E>) + 'static,
    V: Fn(&S) -> Widget,
{
    let mut store = Store::new(init(), reducer);
    let dirty = Rc::new(Cell::new(true));
    {
        let dirty = dirty.clone();
        store.subscribe(move || dirty.set(true));
    }

    let mut subs = subscriptions(surface);
    subs.start(store.dispatch());

    let mut prev: Option<Widget> = None;
    let mut size = surface.size();
    debug!(width = size.0, height = size.1, "frame loop started");

    while !store.should_quit() && !surface.should_close() {
        surface.poll()?;
        store.process();

        let new_size = surface.size();
        if new_size != size {
            trace!(width = new_size.0, height = new_size.1, "surface resized");
            size = new_size;
            dirty.set(true);
        }

        if dirty.get() {
            dirty.set(false);
            let mut next = view(store.state());
            next.layout(Constraint::loose(size.0, size.1));
            match &prev {
                None => {
                    trace!(tree = %format_tree(&next), "first frame");
                    render_tree(surface, &next);
                }
                Some(prev) => render_diff(surface, prev, &next),
            }
            surface.present()?;
            prev = Some(next);
        }
    }

    subs.stop();
    debug!("frame loop stopped");
    Ok(())
}

/// Run an application on the process's terminal.
///
/// Opens a [`TermSurface`](tatami_core::term::TermSurface) with the given
/// size hint and title, then delegates to [`run`]. The terminal is restored
/// when this returns.
#[cfg(not(target_arch = "wasm32"))]
pub fn run_terminal<S, E, I, B, R, V>(
    width: i32,
    height: i32,
    title: &str,
    init: I,
    subscriptions: B,
    reducer: R,
    view: V,
) -> io::Result<()>
where
    S: Clone + PartialEq + 'static,
    E: Clone + Send + 'static,
    I: FnOnce() -> S,
    B: FnOnce(&tatami_core::term::TermSurface) -> Box<dyn Subscription<E>>,
    R: Fn(&S, E) -> (S, Cmd<E>) + 'static,
    V: Fn(&S) -> Widget,
{
    let options = tatami_core::term::TermOptions::new(width, height, title);
    let mut surface = tatami_core::term::TermSurface::new(options)?;
    run(&mut surface, init, subscriptions, reducer, view)
}
