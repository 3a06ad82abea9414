#![forbid(unsafe_code)]

//! Commands: one-shot side effects requested by the reducer.
//!
//! A reducer never performs effects itself — it returns a `Cmd` describing
//! what should happen, and the store executes it after recording the new
//! state. Effects receive a [`Dispatch`] handle and may enqueue further
//! events; those land behind anything already queued and are processed in
//! the same drain pass.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::store::Dispatch;

/// A side effect requested by the reducer, executed by the store.
#[derive(Default)]
pub enum Cmd<E> {
    /// No effect.
    #[default]
    None,
    /// Stop the run loop. Takes effect only after the current drain pass
    /// completes and any pending redraw has happened.
    Quit,
    /// Run several commands in order.
    Batch(Vec<Cmd<E>>),
    /// Run an arbitrary one-shot effect with access to the dispatcher.
    Effect(Box<dyn FnOnce(&Dispatch<E>)>),
}

impl<E> Cmd<E> {
    /// No effect.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// Signal the run loop to stop.
    #[inline]
    #[must_use]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Run several commands in order.
    ///
    /// Empty batches collapse to `None` and single-element batches to the
    /// command itself.
    #[must_use]
    pub fn batch(mut cmds: Vec<Self>) -> Self {
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Run a one-shot effect.
    #[must_use]
    pub fn effect(f: impl FnOnce(&Dispatch<E>) + 'static) -> Self {
        Self::Effect(Box::new(f))
    }

    /// Dispatch an event immediately.
    #[must_use]
    pub fn msg(event: E) -> Self
    where
        E: 'static,
    {
        Self::effect(move |dispatch| dispatch.send(event))
    }

    /// Dispatch the current UNIX time in seconds, mapped into an event.
    #[must_use]
    pub fn current_time(map: impl FnOnce(f64) -> E + 'static) -> Self
    where
        E: 'static,
    {
        Self::effect(move |dispatch| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0.0, |d| d.as_secs_f64());
            dispatch.send(map(now));
        })
    }

    /// A stable name for tracing.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Effect(_) => "Effect",
        }
    }
}

impl<E> std::fmt::Debug for Cmd<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Batch(cmds) => f.debug_tuple("Batch").field(&cmds.len()).finish(),
            other => f.write_str(other.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_collapses_trivial_cases() {
        assert!(matches!(Cmd::<()>::batch(vec![]), Cmd::None));
        assert!(matches!(Cmd::<()>::batch(vec![Cmd::Quit]), Cmd::Quit));
        assert!(matches!(
            Cmd::<()>::batch(vec![Cmd::Quit, Cmd::None]),
            Cmd::Batch(_)
        ));
    }

    #[test]
    fn default_is_none() {
        assert!(matches!(Cmd::<()>::default(), Cmd::None));
    }

    #[test]
    fn type_names_are_stable() {
        assert_eq!(Cmd::<()>::none().type_name(), "None");
        assert_eq!(Cmd::<()>::quit().type_name(), "Quit");
        assert_eq!(Cmd::<()>::effect(|_| {}).type_name(), "Effect");
        assert_eq!(
            Cmd::<()>::batch(vec![Cmd::None, Cmd::None]).type_name(),
            "Batch"
        );
    }
}
