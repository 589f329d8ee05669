use std::cell::RefCell;
use std::rc::Rc;

use crate::effects::Unsubscribe;
use crate::state::StateHolder;
use crate::store::Store;

/// Owner of a group of subscriptions, usually one mounted view.
///
/// Disposing the scope (or dropping its last clone) releases everything it
/// owns, children first.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Scope>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                disposers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    /// Ties an existing handle to this scope.
    pub fn own(&self, handle: Unsubscribe) {
        self.add_disposer(move || handle.run());
    }

    /// [`Store::subscribe`], released when this scope is disposed.
    pub fn subscribe<H, T, F, C>(&self, store: &Store<H>, selector: F, on_change: C) -> Unsubscribe
    where
        H: StateHolder,
        T: Clone + PartialEq + 'static,
        F: Fn(&H::State) -> T + 'static,
        C: Fn(&T) + 'static,
    {
        let handle = store.subscribe(selector, on_change);
        self.own(handle.clone());
        handle
    }

    pub fn child(&self) -> Scope {
        let child = Scope::new();
        self.inner.children.borrow_mut().push(child.clone());
        child
    }

    pub fn dispose(self) {
        self.inner.release();
    }
}

impl ScopeInner {
    fn release(&self) {
        // Dispose children first
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.dispose();
        }

        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.release();
    }
}
