use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    hash::Hash,
};

/// Collapses a burst of calls per key into the last one.
///
/// Each call waits for the supplied delay. Only the call that is still the most recent for its
/// key when its delay has elapsed yields its value; all earlier calls yield `None`. The delay is
/// passed in by the caller so the debouncer does not depend on a particular timer.
#[derive(Debug)]
pub struct Debouncer<K> {
    latest: RefCell<HashMap<K, u64>>,
    counter: Cell<u64>,
}

impl<K: Eq + Hash + Clone> Debouncer<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: RefCell::new(HashMap::new()),
            counter: Cell::new(0),
        }
    }

    pub async fn debounce<V>(
        &self,
        key: K,
        value: V,
        delay: impl Future<Output = ()>,
    ) -> Option<V> {
        let generation = self.counter.get().wrapping_add(1);
        self.counter.set(generation);
        self.latest.borrow_mut().insert(key.clone(), generation);

        delay.await;

        let mut latest = self.latest.borrow_mut();
        if latest.get(&key) == Some(&generation) {
            latest.remove(&key);
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.latest.borrow().contains_key(key)
    }

    pub fn cancel(&self, key: &K) {
        self.latest.borrow_mut().remove(key);
    }
}

impl<K: Eq + Hash + Clone> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new()
    }
}
