//! # Store, Actions, and Subscriptions
//!
//! Tally keeps application state in one container and only lets it change
//! through actions. There are four main pieces:
//!
//! - `CounterState` — the immutable snapshot held by the store.
//! - `Action` — a requested transition, built with `increment_by_amount` / `reset`.
//! - `Store::dispatch` — runs the reducer and publishes the new snapshot.
//! - `Store::subscribe` — re-runs a selector after each change and calls back
//!   when its output differs.
//!
//! ## Dispatching
//!
//! ```rust
//! use tally_core::prelude::*;
//!
//! let store = CounterStore::new();
//! store.dispatch(increment_by_amount(1.0));
//! store.dispatch(increment_by_amount(4.0));
//! assert_eq!(store.select(current_count), 5.0);
//!
//! store.dispatch(reset());
//! assert_eq!(store.state(), CounterState::new(0.0));
//! ```
//!
//! Non-finite amounts never reach the count; the reducer leaves state alone:
//!
//! ```rust
//! use tally_core::prelude::*;
//!
//! let s = CounterState::new(3.0);
//! assert_eq!(reduce(&s, &increment_by_amount(f64::NAN)), s);
//! ```
//!
//! ## Subscriptions
//!
//! A subscription pairs a selector with a callback. The callback runs once per
//! dispatch, and only when the selected value changed:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tally_core::prelude::*;
//!
//! let store = CounterStore::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let unsubscribe = store.subscribe(current_count, {
//!     let seen = seen.clone();
//!     move |n: &f64| seen.borrow_mut().push(*n)
//! });
//!
//! store.dispatch(increment_by_amount(5.0));
//! store.dispatch(increment_by_amount(0.0)); // no change, no callback
//! unsubscribe.run();
//! store.dispatch(reset());
//!
//! assert_eq!(*seen.borrow(), vec![5.0]);
//! ```
//!
//! - Dispatching from inside a callback is queued and runs after the current
//!   dispatch finishes; `try_dispatch` reports it as an error instead.
//! - `Scope` groups the handles of one consumer so they are released together.
//!
//! The store is `!Send`: build one at startup and pass clones of the handle
//! to whatever needs it.

pub mod action;
pub mod config;
pub mod effects;
pub mod error;
pub mod input;
pub mod prelude;
pub mod scope;
mod selector;
pub mod state;
pub mod store;

pub use action::*;
pub use config::*;
pub use effects::*;
pub use error::*;
pub use input::*;
pub use scope::*;
pub use state::*;
pub use store::*;
