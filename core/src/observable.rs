//! An insertion-ordered list that notifies subscribers when its contents are
//! replaced.
//!
//! # Design
//! The only mutation is `replace_all`, which swaps the whole contents in one
//! step and then notifies each observer once with the new slice. Observers
//! therefore never see a half-cleared or half-filled list.

use std::fmt;

/// Callback invoked with the full contents after every replacement.
pub type Observer<T> = Box<dyn FnMut(&[T])>;

/// Handle returned by `ObservableList::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }
}

pub struct ObservableList<T> {
    items: Vec<T>,
    observers: Vec<(SubscriptionId, Observer<T>)>,
    next_id: u64,
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            observers: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer`. Ids start at 1 and are never reused.
    pub fn subscribe(&mut self, observer: impl FnMut(&[T]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Clear and repopulate in one step, then notify every observer.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        for (_, observer) in &mut self.observers {
            observer(&self.items);
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn starts_empty() {
        let list: ObservableList<i32> = ObservableList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.get(0).is_none());
    }

    #[test]
    fn replace_all_drops_previous_contents() {
        let mut list = ObservableList::new();
        list.replace_all(vec![1, 2, 3]);
        list.replace_all(vec![9]);
        assert_eq!(list.as_slice(), &[9]);
    }

    #[test]
    fn observers_see_only_complete_states() {
        let seen: Rc<RefCell<Vec<Vec<i32>>>> = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObservableList::new();
        let sink = Rc::clone(&seen);
        list.subscribe(move |items: &[i32]| sink.borrow_mut().push(items.to_vec()));

        list.replace_all(vec![1, 2]);
        list.replace_all(Vec::new());
        list.replace_all(vec![3]);

        assert_eq!(*seen.borrow(), vec![vec![1, 2], vec![], vec![3]]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let calls = Rc::new(RefCell::new(0));
        let mut list = ObservableList::new();
        let counter = Rc::clone(&calls);
        let id = list.subscribe(move |_: &[i32]| *counter.borrow_mut() += 1);

        list.replace_all(vec![1]);
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        list.replace_all(vec![2]);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(list.observer_count(), 0);
    }

    #[test]
    fn subscription_ids_are_not_reused() {
        let mut list: ObservableList<i32> = ObservableList::new();
        let a = list.subscribe(|_| {});
        list.unsubscribe(a);
        let b = list.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(a.as_u64(), 1);
        assert_eq!(SubscriptionId::from_u64(b.as_u64()), b);
    }
}
