#![forbid(unsafe_code)]

//! The tatami runtime.
//!
//! This crate ties widgets and the surface into a running application:
//!
//! - [`Store`] - one authoritative state value advanced by a pure reducer
//!   over a strictly ordered event queue, with redraw coalescing
//! - [`Cmd`] - one-shot side effects requested by the reducer, executed by
//!   the store strictly outside the reducer
//! - [`Subscription`] - long-lived external event sources with an explicit
//!   start/stop lifecycle ([`Every`], [`KeyDown`], [`PointerMove`], [`Many`])
//! - [`program::run`] - the frame loop binding state to layout and the
//!   reconciler once per drawable frame
//!
//! Event producers may run on any thread; they only ever append to the
//! store's queue through a [`Dispatch`] handle. The reducer and all
//! rendering run on the thread that owns the store.

pub mod cmd;
pub mod program;
pub mod store;
pub mod subscription;

pub use cmd::Cmd;
pub use program::run;
pub use store::{Dispatch, History, Store, SubscriberId};
pub use subscription::{Every, KeyDown, Many, PointerMove, Subscription};

#[cfg(not(target_arch = "wasm32"))]
pub use program::run_terminal;
