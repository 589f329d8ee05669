use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::config::StoreConfig;
use crate::effects::Unsubscribe;
use crate::error::StoreError;
use crate::selector::{Observer, Registry, Selection};
use crate::state::{Counter, StateHolder};

type ActionListener<H> = dyn Fn(
    &<H as StateHolder>::Action,
    &<H as StateHolder>::State,
    &<H as StateHolder>::State,
);

/// Cloneable handle to a single-threaded state container.
///
/// All state changes go through [`Store::dispatch`]. Clones refer to the same
/// store; hand them to consumers explicitly instead of reaching for a global.
pub struct Store<H: StateHolder = Counter>(Rc<Inner<H>>);

/// The counter store used by the demo.
pub type CounterStore = Store<Counter>;

struct Inner<H: StateHolder> {
    state: RefCell<H::State>,
    subs: RefCell<Registry<dyn Observer<H::State>>>,
    action_listeners: RefCell<Registry<ActionListener<H>>>,
    pending: RefCell<VecDeque<H::Action>>,
    dispatching: Cell<bool>,
    // actions accepted since the outermost dispatch began
    cascade: Cell<usize>,
    dispatched: Cell<u64>,
    config: StoreConfig,
}

impl<H: StateHolder> Clone for Store<H> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<H: StateHolder> Default for Store<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: StateHolder> Store<H> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_state(H::initial_state(), config)
    }

    pub fn with_state(state: H::State, config: StoreConfig) -> Self {
        Self(Rc::new(Inner {
            state: RefCell::new(state),
            subs: RefCell::new(Registry::default()),
            action_listeners: RefCell::new(Registry::default()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            cascade: Cell::new(0),
            dispatched: Cell::new(0),
            config,
        }))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.0.config
    }

    /// Clone of the current snapshot.
    pub fn state(&self) -> H::State {
        self.0.state.borrow().clone()
    }

    /// Reads a derived value from the current snapshot.
    pub fn select<T>(&self, selector: impl FnOnce(&H::State) -> T) -> T {
        selector(&self.0.state.borrow())
    }

    /// Number of actions run through the reducer so far, no-ops included.
    pub fn dispatch_count(&self) -> u64 {
        self.0.dispatched.get()
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subs.borrow().len()
    }

    pub fn observer_count(&self) -> usize {
        self.0.action_listeners.borrow().len()
    }

    pub fn is_dispatching(&self) -> bool {
        self.0.dispatching.get()
    }

    /// Submits an action.
    ///
    /// Outside a dispatch this runs the reducer and notifies subscribers before
    /// returning. From inside a callback the action is queued and runs once
    /// the current dispatch has finished. Once a single dispatch has cascaded
    /// into `max_cascade` actions, further ones are dropped.
    pub fn dispatch(&self, action: H::Action) {
        if let Err(e) = self.enqueue(action) {
            log::error!("dropping action: {e}");
        }
    }

    /// Like [`Store::dispatch`], but refuses to queue: re-entrant calls are
    /// reported to the caller.
    pub fn try_dispatch(&self, action: H::Action) -> Result<(), StoreError> {
        if self.0.dispatching.get() {
            log::warn!("rejecting re-entrant dispatch of {action:?}");
            return Err(StoreError::ReentrantDispatch);
        }
        self.enqueue(action)
    }

    /// Observes a slice of state. `on_change` fires once per dispatch in which
    /// `selector`'s output differs from the last value it saw.
    pub fn subscribe<T, F, C>(&self, selector: F, on_change: C) -> Unsubscribe
    where
        T: Clone + PartialEq + 'static,
        F: Fn(&H::State) -> T + 'static,
        C: Fn(&T) + 'static,
    {
        let entry: Rc<dyn Observer<H::State>> = {
            let state = self.0.state.borrow();
            Rc::new(Selection::new(&*state, selector, on_change))
        };
        let id = self.0.subs.borrow_mut().insert(entry);
        let weak = Rc::downgrade(&self.0);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subs.borrow_mut().remove(id);
            }
        })
    }

    /// Observes the whole state.
    pub fn subscribe_state(&self, on_change: impl Fn(&H::State) + 'static) -> Unsubscribe {
        self.subscribe(|s: &H::State| s.clone(), on_change)
    }

    /// Registers a read-only listener told about every state-changing action
    /// as `(action, previous, next)`. It runs before selector subscriptions.
    pub fn observe_actions(
        &self,
        listener: impl Fn(&H::Action, &H::State, &H::State) + 'static,
    ) -> Unsubscribe {
        let entry: Rc<ActionListener<H>> = Rc::new(listener);
        let id = self.0.action_listeners.borrow_mut().insert(entry);
        let weak: Weak<Inner<H>> = Rc::downgrade(&self.0);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.action_listeners.borrow_mut().remove(id);
            }
        })
    }

    /// Drops every subscription, listener and queued action.
    ///
    /// Dropping the last handle does this too, but a callback that captured a
    /// clone of the store keeps the store alive through its own registration.
    /// Call `teardown` at shutdown whenever that can be the case.
    pub fn teardown(&self) {
        let subs = self.0.subs.borrow().len();
        self.0.subs.borrow_mut().clear();
        self.0.action_listeners.borrow_mut().clear();
        self.0.pending.borrow_mut().clear();
        log::debug!("store torn down ({subs} subscriptions released)");
    }

    fn enqueue(&self, action: H::Action) -> Result<(), StoreError> {
        let limit = self.0.config.max_cascade.max(1);
        let accepted = self.0.cascade.get();
        if accepted >= limit {
            return Err(StoreError::CascadeLimit { limit });
        }
        self.0.cascade.set(accepted + 1);
        self.0.pending.borrow_mut().push_back(action);
        if self.0.dispatching.get() {
            log::trace!("dispatch in flight; action queued");
            return Ok(());
        }
        self.drain();
        Ok(())
    }

    fn drain(&self) {
        let _guard = DispatchGuard::enter(self);
        loop {
            let next = self.0.pending.borrow_mut().pop_front();
            let Some(action) = next else { break };
            self.apply(&action);
        }
    }

    fn apply(&self, action: &H::Action) {
        let prev = self.state();
        let next = H::reduce(&prev, action);
        self.0.dispatched.set(self.0.dispatched.get() + 1);

        if next == prev {
            log::debug!("{action:?} left state unchanged");
            return;
        }
        if self.0.config.trace_actions {
            log::debug!("{action:?}: {prev:?} -> {next:?}");
        }

        *self.0.state.borrow_mut() = next.clone();

        let listeners = self.0.action_listeners.borrow().ids();
        for id in listeners {
            // looked up per call so a listener removed mid-pass is skipped
            let listener = self.0.action_listeners.borrow().get(id);
            if let Some(listener) = listener {
                listener(action, &prev, &next);
            }
        }

        let ids = self.0.subs.borrow().ids();
        log::trace!("notifying {} subscriptions", ids.len());
        for id in ids {
            let sub = self.0.subs.borrow().get(id);
            if let Some(sub) = sub {
                sub.notify(&next);
            }
        }
    }
}

/// Clears the in-flight flag even if a callback panics.
struct DispatchGuard<'a, H: StateHolder>(&'a Inner<H>);

impl<'a, H: StateHolder> DispatchGuard<'a, H> {
    fn enter(store: &'a Store<H>) -> Self {
        store.0.dispatching.set(true);
        Self(&*store.0)
    }
}

impl<H: StateHolder> Drop for DispatchGuard<'_, H> {
    fn drop(&mut self) {
        self.0.dispatching.set(false);
        self.0.cascade.set(0);
        if std::thread::panicking() {
            self.0.pending.borrow_mut().clear();
        }
    }
}
