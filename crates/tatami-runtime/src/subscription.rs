#![forbid(unsafe_code)]

//! Subscriptions: long-lived external event sources.
//!
//! A subscription is a descriptor with an explicit lifecycle: `start`
//! receives a [`Dispatch`] handle and begins producing events; `stop` ends
//! production. Stopping is synchronous — once `stop` returns, no further
//! dispatch from that subscription can occur (already-enqueued events are
//! not retracted; they drain normally).
//!
//! Built-ins: [`Many`] composes a fixed set, [`Every`] dispatches a mapped
//! event at a fixed interval from a worker thread, and [`KeyDown`] /
//! [`PointerMove`] bind a surface input stream for the session.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use tatami_core::event::KeyEvent;
use tatami_core::surface::{HandlerId, InputHooks};

use crate::store::Dispatch;

/// A long-lived event source with an explicit start/stop lifecycle.
pub trait Subscription<E> {
    /// Begin producing events through `dispatch`.
    ///
    /// Starting an already started subscription is a no-op.
    fn start(&mut self, dispatch: Dispatch<E>);

    /// Stop producing events. When this returns, no further dispatch from
    /// this subscription will occur. Stopping twice is a no-op.
    fn stop(&mut self);
}

/// Signal checked by a subscription worker to know when to exit.
#[derive(Clone)]
struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: inner.clone(),
        };
        (signal, StopTrigger { inner })
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if the timeout elapsed. Loops on
    /// the condvar so spurious wakeups do not cut the interval short.
    fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap();
        if *stopped {
            return true;
        }

        let start = Instant::now();
        loop {
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar.wait_timeout(stopped, duration - elapsed).unwrap();
            stopped = guard;
            if *stopped {
                return true;
            }
        }
    }
}

/// The store-side trigger that flips a [`StopSignal`].
struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }
}

/// Compose a fixed set of subscriptions into one.
pub struct Many<E> {
    subs: Vec<Box<dyn Subscription<E>>>,
}

impl<E> Many<E> {
    /// Compose the given subscriptions.
    #[must_use]
    pub fn new(subs: Vec<Box<dyn Subscription<E>>>) -> Self {
        Self { subs }
    }
}

impl<E> Subscription<E> for Many<E> {
    fn start(&mut self, dispatch: Dispatch<E>) {
        for sub in &mut self.subs {
            sub.start(dispatch.clone());
        }
    }

    fn stop(&mut self) {
        for sub in &mut self.subs {
            sub.stop();
        }
    }
}

/// Dispatch a mapped event every time an interval elapses.
///
/// Runs on a dedicated worker thread. `stop` triggers the worker's stop
/// signal and joins it, so cancellation always lands between iterations,
/// before the next dispatch.
pub struct Every<E> {
    interval: Duration,
    make_event: Arc<dyn Fn() -> E + Send + Sync>,
    worker: Option<(StopTrigger, JoinHandle<()>)>,
}

impl<E> Every<E> {
    /// Dispatch `make_event()` after every `interval`.
    #[must_use]
    pub fn new(interval: Duration, make_event: impl Fn() -> E + Send + Sync + 'static) -> Self {
        Self {
            interval,
            make_event: Arc::new(make_event),
            worker: None,
        }
    }
}

impl<E: Send + 'static> Subscription<E> for Every<E> {
    fn start(&mut self, dispatch: Dispatch<E>) {
        if self.worker.is_some() {
            return;
        }
        let interval_ms = self.interval.as_millis() as u64;
        debug!(interval_ms, "timer subscription started");
        let (signal, trigger) = StopSignal::new();
        let make_event = self.make_event.clone();
        let interval = self.interval;
        let handle = thread::spawn(move || {
            loop {
                if signal.wait_timeout(interval) {
                    break;
                }
                dispatch.send(make_event());
            }
        });
        self.worker = Some((trigger, handle));
    }

    fn stop(&mut self) {
        if let Some((trigger, handle)) = self.worker.take() {
            trigger.stop();
            // Join so no dispatch can happen after stop() returns.
            let _ = handle.join();
            debug!("timer subscription stopped");
        }
    }
}

/// Dispatch a mapped event for every key press on a surface.
pub struct KeyDown<E> {
    hooks: InputHooks,
    map: Arc<dyn Fn(KeyEvent) -> E + Send + Sync>,
    handler: Option<HandlerId>,
}

impl<E> KeyDown<E> {
    /// Bind to a surface's key stream via its [`InputHooks`].
    #[must_use]
    pub fn new(hooks: InputHooks, map: impl Fn(KeyEvent) -> E + Send + Sync + 'static) -> Self {
        Self {
            hooks,
            map: Arc::new(map),
            handler: None,
        }
    }
}

impl<E: Send + 'static> Subscription<E> for KeyDown<E> {
    fn start(&mut self, dispatch: Dispatch<E>) {
        if self.handler.is_some() {
            return;
        }
        let map = self.map.clone();
        self.handler = Some(
            self.hooks
                .on_key_down(move |key| dispatch.send(map(key))),
        );
    }

    fn stop(&mut self) {
        if let Some(id) = self.handler.take() {
            self.hooks.remove(id);
        }
    }
}

/// Dispatch a mapped event for every pointer move on a surface.
pub struct PointerMove<E> {
    hooks: InputHooks,
    map: Arc<dyn Fn(i32, i32) -> E + Send + Sync>,
    handler: Option<HandlerId>,
}

impl<E> PointerMove<E> {
    /// Bind to a surface's pointer stream via its [`InputHooks`].
    #[must_use]
    pub fn new(hooks: InputHooks, map: impl Fn(i32, i32) -> E + Send + Sync + 'static) -> Self {
        Self {
            hooks,
            map: Arc::new(map),
            handler: None,
        }
    }
}

impl<E: Send + 'static> Subscription<E> for PointerMove<E> {
    fn start(&mut self, dispatch: Dispatch<E>) {
        if self.handler.is_some() {
            return;
        }
        let map = self.map.clone();
        self.handler = Some(
            self.hooks
                .on_pointer_move(move |x, y| dispatch.send(map(x, y))),
        );
    }

    fn stop(&mut self) {
        if let Some(id) = self.handler.take() {
            self.hooks.remove(id);
        }
    }
}
