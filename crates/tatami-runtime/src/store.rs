#![forbid(unsafe_code)]

//! The store: one authoritative state, advanced by a pure reducer.
//!
//! Events from any source — input handlers, timers, effects — funnel into
//! one ordered queue through cloneable [`Dispatch`] handles. The store is
//! either idle or draining: a drain pass pops events one at a time, applies
//! `reducer(state, event) -> (state, cmd)`, records the result, executes
//! the command, and repeats until the queue is empty. The reducer therefore
//! runs strictly sequentially, in arrival order, never concurrently with
//! itself — the system's principal ordering guarantee.
//!
//! Redraws coalesce: after a drain pass, subscribers are notified exactly
//! once, and only if the final state differs by value from the state the
//! pass started with.
//!
//! Reducer panics are not caught; they propagate to whoever called the
//! drain. There is no retry and no suppression.

use std::collections::VecDeque;
use std::sync::mpsc;

use tracing::{debug_span, trace};

use crate::cmd::Cmd;

/// How many `(event, state)` entries the history ring retains.
///
/// Only the newest entry is ever read operationally; the tail exists so a
/// debugger can inspect the recent event trail without the store growing
/// without bound.
pub(crate) const HISTORY_CAPACITY: usize = 64;

/// A cloneable, thread-safe handle that appends events to a store's queue.
///
/// Sends after the store has been dropped are silently discarded — a
/// stopped subscription may still hold a handle while it winds down.
pub struct Dispatch<E> {
    tx: mpsc::Sender<E>,
}

impl<E> Clone for Dispatch<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> Dispatch<E> {
    /// Append an event to the queue.
    pub fn send(&self, event: E) {
        let _ = self.tx.send(event);
    }
}

/// Bounded ring of `(event, state)` pairs, newest last.
///
/// Seeded with the initial state under a `None` event so the top is always
/// readable once the store exists.
pub struct History<S, E> {
    entries: VecDeque<(Option<E>, S)>,
    capacity: usize,
}

impl<S, E> History<S, E> {
    fn new(initial: S) -> Self {
        let mut entries = VecDeque::with_capacity(HISTORY_CAPACITY);
        entries.push_back((None, initial));
        Self {
            entries,
            capacity: HISTORY_CAPACITY,
        }
    }

    fn push(&mut self, event: E, state: S) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((Some(event), state));
    }

    /// The current state.
    ///
    /// # Panics
    ///
    /// Panics if the history is empty — a store initialization bug.
    #[must_use]
    pub fn top(&self) -> &S {
        self.entries
            .back()
            .map(|(_, state)| state)
            .expect("state history is empty: store was never initialized")
    }

    /// The event that produced the current state, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<&E> {
        self.entries.back().and_then(|(event, _)| event.as_ref())
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate retained `(event, state)` entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&E>, &S)> {
        self.entries
            .iter()
            .map(|(event, state)| (event.as_ref(), state))
    }
}

/// Identifies a redraw subscriber so it can be detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// One authoritative state value behind an ordered event queue.
pub struct Store<S, E> {
    reducer: Box<dyn Fn(&S, E) -> (S, Cmd<E>)>,
    history: History<S, E>,
    tx: mpsc::Sender<E>,
    rx: mpsc::Receiver<E>,
    subscribers: Vec<(SubscriberId, Box<dyn FnMut()>)>,
    next_subscriber: u64,
    quit: bool,
}

impl<S, E> Store<S, E>
where
    S: Clone + PartialEq + 'static,
    E: Clone + 'static,
{
    /// Create a store with its initial state and reducer.
    pub fn new(initial: S, reducer: impl Fn(&S, E) -> (S, Cmd<E>) + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            reducer: Box::new(reducer),
            history: History::new(initial),
            tx,
            rx,
            subscribers: Vec::new(),
            next_subscriber: 0,
            quit: false,
        }
    }

    /// A handle for appending events from any thread.
    #[must_use]
    pub fn dispatch(&self) -> Dispatch<E> {
        Dispatch {
            tx: self.tx.clone(),
        }
    }

    /// Append an event from the owning thread.
    pub fn send(&self, event: E) {
        let _ = self.tx.send(event);
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &S {
        self.history.top()
    }

    /// The retained `(event, state)` trail.
    #[must_use]
    pub fn history(&self) -> &History<S, E> {
        &self.history
    }

    /// Whether a quit command has fired.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Register a callback invoked once per drain pass that changed the
    /// state by value.
    pub fn subscribe(&mut self, callback: impl FnMut() + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a redraw subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Drain the queue if any event is ready. Returns whether a drain pass
    /// ran.
    pub fn process(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(event) => {
                self.drain(event);
                true
            }
            Err(_) => false,
        }
    }

    /// Block until an event arrives, then drain the queue.
    pub fn process_blocking(&mut self) {
        // The store holds a sender, so recv can only fail if the store
        // itself is torn down mid-call.
        if let Ok(event) = self.rx.recv() {
            self.drain(event);
        }
    }

    /// One drain pass: idle -> draining -> idle.
    fn drain(&mut self, first: E) {
        let span = debug_span!("store.drain");
        let _guard = span.enter();

        let start_state = self.state().clone();
        let mut processed = 0usize;
        let mut event = first;
        loop {
            let (state, cmd) = (self.reducer)(self.state(), event.clone());
            self.history.push(event, state);
            processed += 1;
            trace!(cmd = cmd.type_name(), "event applied");
            self.execute(cmd);
            // Effects may have enqueued more; keep going until the queue
            // is truly empty so one burst becomes one redraw.
            match self.rx.try_recv() {
                Ok(next) => event = next,
                Err(_) => break,
            }
        }

        let dirty = *self.state() != start_state;
        trace!(processed, dirty, "drain pass complete");
        if dirty {
            for (_, callback) in self.subscribers.iter_mut() {
                callback();
            }
        }
    }

    fn execute(&mut self, cmd: Cmd<E>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.quit = true,
            Cmd::Batch(cmds) => {
                // Quit does not short-circuit: the pass still applies every
                // queued event before the outer loop observes the flag.
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
            Cmd::Effect(f) => f(&self.dispatch()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Counted {
        seen: Vec<i32>,
    }

    fn recording_store() -> Store<Counted, i32> {
        Store::new(Counted { seen: vec![] }, |state, event| {
            let mut next = state.clone();
            next.seen.push(event);
            (next, Cmd::none())
        })
    }

    #[test]
    fn state_before_any_event_is_the_initial_state() {
        let store = recording_store();
        assert_eq!(store.state().seen, Vec::<i32>::new());
        assert_eq!(store.history().len(), 1);
        assert!(store.history().last_event().is_none());
    }

    #[test]
    fn events_apply_in_dispatch_order() {
        let mut store = recording_store();
        store.send(1);
        store.send(2);
        store.send(3);
        assert!(store.process());
        assert_eq!(store.state().seen, vec![1, 2, 3]);
    }

    #[test]
    fn process_returns_false_when_idle() {
        let mut store = recording_store();
        assert!(!store.process());
    }

    #[test]
    fn burst_notifies_subscribers_exactly_once() {
        let mut store = recording_store();
        let redraws = Rc::new(Cell::new(0));
        let r = redraws.clone();
        store.subscribe(move || r.set(r.get() + 1));

        store.send(1);
        store.send(2);
        store.send(3);
        store.process();
        assert_eq!(redraws.get(), 1);

        store.send(4);
        store.process();
        assert_eq!(redraws.get(), 2);
    }

    #[test]
    fn unchanged_state_suppresses_notification() {
        let mut store: Store<i32, i32> = Store::new(0, |state, event| {
            // Only event 7 changes anything.
            if event == 7 {
                (state + 1, Cmd::none())
            } else {
                (*state, Cmd::none())
            }
        });
        let redraws = Rc::new(Cell::new(0));
        let r = redraws.clone();
        store.subscribe(move || r.set(r.get() + 1));

        store.send(1);
        store.send(2);
        store.process();
        assert_eq!(redraws.get(), 0);

        store.send(1);
        store.send(7);
        store.send(2);
        store.process();
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn unsubscribed_callback_stops_firing() {
        let mut store = recording_store();
        let redraws = Rc::new(Cell::new(0));
        let r = redraws.clone();
        let id = store.subscribe(move || r.set(r.get() + 1));

        store.send(1);
        store.process();
        assert_eq!(redraws.get(), 1);

        store.unsubscribe(id);
        store.send(2);
        store.process();
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn effect_events_join_the_same_drain_pass() {
        let mut store: Store<Counted, i32> =
            Store::new(Counted { seen: vec![] }, |state, event| {
                let mut next = state.clone();
                next.seen.push(event);
                // The first event requests a follow-up.
                let cmd = if event == 1 {
                    Cmd::effect(|dispatch: &Dispatch<i32>| dispatch.send(99))
                } else {
                    Cmd::none()
                };
                (next, cmd)
            });
        let redraws = Rc::new(Cell::new(0));
        let r = redraws.clone();
        store.subscribe(move || r.set(r.get() + 1));

        // The follow-up is enqueued behind 2, which was already waiting.
        store.send(1);
        store.send(2);
        store.process();
        assert_eq!(store.state().seen, vec![1, 2, 99]);
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn quit_is_observed_after_the_full_drain_pass() {
        let mut store: Store<Counted, i32> =
            Store::new(Counted { seen: vec![] }, |state, event| {
                let mut next = state.clone();
                next.seen.push(event);
                let cmd = if event == 2 { Cmd::quit() } else { Cmd::none() };
                (next, cmd)
            });

        store.send(1);
        store.send(2);
        store.send(3);
        store.process();

        // Quit fired mid-pass, yet every event was still applied.
        assert!(store.should_quit());
        assert_eq!(store.state().seen, vec![1, 2, 3]);
    }

    #[test]
    fn batch_runs_all_commands() {
        let mut store: Store<i32, i32> = Store::new(0, |state, event| {
            if event == 0 {
                let cmd = Cmd::batch(vec![
                    Cmd::msg(10),
                    Cmd::quit(),
                    Cmd::msg(20),
                ]);
                (*state, cmd)
            } else {
                (state + event, Cmd::none())
            }
        });

        store.send(0);
        store.process();
        assert!(store.should_quit());
        assert_eq!(*store.state(), 30);
    }

    #[test]
    fn current_time_dispatches_a_timestamp() {
        let mut store: Store<f64, f64> = Store::new(0.0, |state, event| {
            if event < 0.0 {
                (*state, Cmd::current_time(|now| now))
            } else {
                (event, Cmd::none())
            }
        });

        store.send(-1.0);
        store.process();
        assert!(*store.state() > 0.0);
    }

    #[test]
    fn process_blocking_waits_for_cross_thread_dispatch() {
        let mut store = recording_store();
        let dispatch = store.dispatch();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            dispatch.send(42);
        });

        store.process_blocking();
        handle.join().unwrap();
        assert_eq!(store.state().seen, vec![42]);
    }

    #[test]
    fn history_is_bounded() {
        let mut store = recording_store();
        for i in 0..(HISTORY_CAPACITY as i32 * 2) {
            store.send(i);
        }
        store.process();
        assert_eq!(store.history().len(), HISTORY_CAPACITY);
        // The newest entry is the last event applied.
        assert_eq!(
            store.history().last_event(),
            Some(&(HISTORY_CAPACITY as i32 * 2 - 1))
        );
    }

    #[test]
    fn history_iterates_oldest_first() {
        let mut store = recording_store();
        store.send(1);
        store.send(2);
        store.process();

        let events: Vec<_> = store.history().iter().map(|(event, _)| event).collect();
        assert_eq!(events, vec![None, Some(&1), Some(&2)]);
    }

    #[test]
    #[should_panic(expected = "state history is empty")]
    fn empty_history_access_is_fatal() {
        let history: History<i32, i32> = History {
            entries: VecDeque::new(),
            capacity: HISTORY_CAPACITY,
        };
        let _ = history.top();
    }

    #[test]
    fn dispatch_after_store_drop_is_discarded() {
        let store = recording_store();
        let dispatch = store.dispatch();
        drop(store);
        dispatch.send(1);
    }
}
