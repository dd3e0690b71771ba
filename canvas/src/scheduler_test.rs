#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn empty_scheduler_has_nothing_due() {
    let mut s: Scheduler<u32> = Scheduler::new();
    assert!(s.is_empty());
    assert_eq!(s.next_due(), None);
    assert!(s.drain_due(100.0).is_empty());
}

#[test]
fn drain_returns_only_due_keys_in_due_order() {
    let mut s = Scheduler::new();
    s.schedule(1, 0.5);
    s.schedule(2, 0.1);
    s.schedule(3, 2.0);
    assert_eq!(s.drain_due(1.0), vec![2, 1]);
    assert_eq!(s.len(), 1);
    assert_eq!(s.next_due(), Some(2.0));
}

#[test]
fn due_exactly_now_is_drained() {
    let mut s = Scheduler::new();
    s.schedule(7, 1.0);
    assert_eq!(s.drain_due(1.0), vec![7]);
}

#[test]
fn equal_due_times_keep_insertion_order() {
    let mut s = Scheduler::new();
    s.schedule('b', 1.0);
    s.schedule('a', 1.0);
    assert_eq!(s.drain_due(1.0), vec!['b', 'a']);
}

#[test]
fn reschedule_replaces_entry() {
    let mut s = Scheduler::new();
    s.schedule(1, 0.1);
    s.schedule(1, 5.0);
    assert_eq!(s.len(), 1);
    assert!(s.drain_due(1.0).is_empty());
    assert_eq!(s.next_due(), Some(5.0));
}

#[test]
fn cancel_is_independent_per_key() {
    let mut s = Scheduler::new();
    s.schedule(1, 0.1);
    s.schedule(2, 0.1);
    assert!(s.cancel(&1));
    assert!(!s.cancel(&1));
    assert!(!s.is_scheduled(&1));
    assert!(s.is_scheduled(&2));
    assert_eq!(s.drain_due(1.0), vec![2]);
}

#[test]
fn clear_drops_everything() {
    let mut s = Scheduler::new();
    s.schedule(1, 0.1);
    s.schedule(2, 0.2);
    s.clear();
    assert!(s.is_empty());
}
