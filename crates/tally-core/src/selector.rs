use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub(crate) struct SubscriptionId;
}

/// Type-erased subscription: re-runs its selector against a fresh snapshot.
pub(crate) trait Observer<S> {
    fn notify(&self, state: &S);
}

/// (selector, last observed value, callback)
pub(crate) struct Selection<S, T, F, C>
where
    F: Fn(&S) -> T,
    C: Fn(&T),
{
    selector: F,
    last: RefCell<T>,
    on_change: C,
    _state: std::marker::PhantomData<fn(&S)>,
}

impl<S, T, F, C> Selection<S, T, F, C>
where
    T: Clone + PartialEq,
    F: Fn(&S) -> T,
    C: Fn(&T),
{
    pub(crate) fn new(state: &S, selector: F, on_change: C) -> Self {
        let last = RefCell::new(selector(state));
        Self {
            selector,
            last,
            on_change,
            _state: std::marker::PhantomData,
        }
    }
}

impl<S, T, F, C> Observer<S> for Selection<S, T, F, C>
where
    T: Clone + PartialEq,
    F: Fn(&S) -> T,
    C: Fn(&T),
{
    fn notify(&self, state: &S) {
        let next = (self.selector)(state);
        {
            let mut last = self.last.borrow_mut();
            if *last == next {
                return;
            }
            *last = next.clone();
        }
        // borrow released: the callback may select, subscribe or unsubscribe
        (self.on_change)(&next);
    }
}

/// Registry of live subscriptions, keyed by generational ids so a stale
/// unsubscribe can never hit a newer registration.
pub(crate) struct Registry<E: ?Sized> {
    entries: SlotMap<SubscriptionId, Rc<E>>,
}

impl<E: ?Sized> Default for Registry<E> {
    fn default() -> Self {
        Self {
            entries: SlotMap::with_key(),
        }
    }
}

impl<E: ?Sized> Registry<E> {
    pub(crate) fn insert(&mut self, entry: Rc<E>) -> SubscriptionId {
        self.entries.insert(entry)
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub(crate) fn get(&self, id: SubscriptionId) -> Option<Rc<E>> {
        self.entries.get(id).cloned()
    }

    /// Snapshot of the live ids; later removals don't affect it.
    pub(crate) fn ids(&self) -> smallvec::SmallVec<[SubscriptionId; 8]> {
        self.entries.keys().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
