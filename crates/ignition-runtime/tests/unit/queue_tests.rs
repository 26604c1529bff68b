//! Unit tests for the ordered unique provider queue.

use std::sync::Arc;

use ignition_domain::Provider;
use ignition_runtime::ProviderQueue;

use crate::support::RecordingProvider;

fn handle(name: &str) -> Arc<dyn Provider> {
    RecordingProvider::new(name)
}

#[test]
fn add_deduplicates_by_identity_and_name() {
    let queue = ProviderQueue::new();
    let a: Arc<dyn Provider> = RecordingProvider::new("a");

    assert!(queue.add(Arc::clone(&a)));
    assert!(!queue.add(Arc::clone(&a)), "same handle must be rejected");
    assert!(
        !queue.add(handle("a")),
        "distinct handle with equal name must be rejected"
    );
    assert!(queue.add(handle("b")));
    assert_eq!(queue.count(), 2);
}

#[test]
fn count_equals_distinct_handles_added() {
    let queue = ProviderQueue::new();
    let names = ["a", "b", "a", "c", "b", "a"];
    for name in names {
        queue.add(handle(name));
    }
    assert_eq!(queue.count(), 3);
}

#[test]
fn exists_matches_present_handles() {
    let queue = ProviderQueue::new();
    let a: Arc<dyn Provider> = RecordingProvider::new("a");
    queue.add(Arc::clone(&a));

    assert!(queue.exists(&a));
    let same_name: Arc<dyn Provider> = RecordingProvider::new("a");
    assert!(queue.exists(&same_name));
    let other: Arc<dyn Provider> = RecordingProvider::new("b");
    assert!(!queue.exists(&other));
}

#[test]
fn offset_get_out_of_range_is_none() {
    let queue = ProviderQueue::new();
    queue.add(handle("a"));
    assert!(queue.offset_get(0).is_some());
    assert!(queue.offset_get(1).is_none());
    assert!(queue.offset_get(99).is_none());
}

#[test]
fn offset_unset_shifts_later_elements_down() {
    let queue = ProviderQueue::of(["a", "b", "c"].map(handle));
    queue.offset_unset(1);

    assert_eq!(queue.count(), 2);
    assert_eq!(queue.offset_get(0).unwrap().name(), "a");
    assert_eq!(queue.offset_get(1).unwrap().name(), "c");

    // Out of range is a silent no-op.
    queue.offset_unset(5);
    assert_eq!(queue.count(), 2);
}

#[test]
fn offset_set_replaces_in_range_and_appends_otherwise() {
    let queue = ProviderQueue::of(["a", "b"].map(handle));
    queue.offset_set(1, handle("x"));
    assert_eq!(queue.offset_get(1).unwrap().name(), "x");

    queue.offset_set(10, handle("y"));
    assert_eq!(queue.count(), 3);
    assert_eq!(queue.offset_get(2).unwrap().name(), "y");

    // Append path still deduplicates.
    queue.offset_set(10, handle("y"));
    assert_eq!(queue.count(), 3);
}

#[test]
fn foreach_with_unconditional_unset_visits_every_element_once() {
    let queue = ProviderQueue::of(["a", "b", "c", "d"].map(handle));
    let mut visited = Vec::new();

    queue.foreach(|index, item| {
        visited.push(item.name().to_string());
        queue.offset_unset(index);
        true
    });

    assert_eq!(visited, ["a", "b", "c", "d"]);
    assert!(queue.empty());
}

#[test]
fn foreach_stops_when_visitor_returns_false() {
    let queue = ProviderQueue::of(["a", "b", "c"].map(handle));
    let mut visited = Vec::new();

    queue.foreach(|_, item| {
        visited.push(item.name().to_string());
        false
    });

    assert_eq!(visited, ["a"]);
    assert_eq!(queue.count(), 3);
}

#[test]
fn drain_consumes_in_insertion_order_including_reentrant_adds() {
    let queue = ProviderQueue::of(["a", "b"].map(handle));
    let mut seen = Vec::new();

    queue.drain(|item| {
        if item.name() == "a" {
            // Appended mid-drain; must be processed in the same pass.
            queue.add(handle("c"));
        }
        seen.push(item.name().to_string());
    });

    assert_eq!(seen, ["a", "b", "c"]);
    assert!(queue.empty());
}

#[test]
fn filter_and_start_return_snapshots() {
    let queue = ProviderQueue::of(["a", "b", "c", "d"].map(handle));

    let tail = queue.start(2);
    assert_eq!(tail.count(), 2);
    assert_eq!(tail.offset_get(0).unwrap().name(), "c");
    assert_eq!(queue.count(), 4, "start must not disturb the original");

    let picked = queue.filter(|_, item| item.name() != "b");
    assert_eq!(picked.count(), 3);

    assert_eq!(queue.start(99).count(), 0);
}

#[test]
fn pop_front_and_pop_back() {
    let queue = ProviderQueue::of(["a", "b", "c"].map(handle));
    assert_eq!(queue.pop_front().unwrap().name(), "a");
    assert_eq!(queue.pop_back().unwrap().name(), "c");
    assert_eq!(queue.pop_front().unwrap().name(), "b");
    assert!(queue.pop_front().is_none());
    assert!(queue.pop_back().is_none());
}
