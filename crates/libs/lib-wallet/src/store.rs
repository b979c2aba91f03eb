//! # Observable Value Cells
//!
//! [`Store`] is a single-threaded writable cell with `get` / `set` / `subscribe`, the primitive
//! every piece of connection state is built from.
//!
//! ## Semantics
//!
//! - `subscribe` delivers the current value to the new subscriber immediately (replay).
//! - `set` notifies subscribers synchronously, in subscription order.
//! - No borrow is held while callbacks run, so a callback may read or write any store,
//!   including the one that is notifying it. A `set` issued from inside a callback is queued
//!   and delivered after the current round, so every subscriber observes values in the order
//!   the `set` calls were made.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use lib_wallet::store::Store;
//!
//! let chain_id = Store::new(None::<String>);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! let subscription = chain_id.subscribe(move |value| sink.borrow_mut().push(value.clone()));
//! chain_id.set(Some("0x1".to_string()));
//! subscription.unsubscribe();
//! chain_id.set(Some("0x89".to_string()));
//!
//! assert_eq!(*seen.borrow(), vec![None, Some("0x1".to_string())]);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
    pending: RefCell<VecDeque<T>>,
}

/// Observable value cell. Cloning yields another handle to the same cell.
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                notifying: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Current value (cloned)
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value and notify every subscriber
    pub fn set(&self, value: T) {
        self.inner.value.replace(value.clone());
        self.inner.pending.borrow_mut().push_back(value);

        if self.inner.notifying.get() {
            return;
        }

        self.inner.notifying.set(true);
        let _round = NotifyRound(&self.inner);
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(value) = next else { break };

            let subscribers: Vec<Callback<T>> = self
                .inner
                .subscribers
                .borrow()
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect();
            for callback in subscribers {
                callback(&value);
            }
        }
    }

    /// Modify the value in place, then notify
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Register `callback`; it is called right away with the current value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Unsubscribe {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let callback: Callback<T> = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::clone(&callback)));

        let current = self.get();
        callback(&current);

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        })
    }
}

impl<T: Clone + Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Ends a notification round, also when a subscriber panics, so later sets still notify
struct NotifyRound<'a, T>(&'a Inner<T>);

impl<T> Drop for NotifyRound<'_, T> {
    fn drop(&mut self) {
        self.0.notifying.set(false);
        self.0.pending.borrow_mut().clear();
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping it keeps the subscription alive; call [`Unsubscribe::unsubscribe`] to remove it.
pub struct Unsubscribe {
    release: Option<Box<dyn FnOnce()>>,
}

impl Unsubscribe {
    fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
