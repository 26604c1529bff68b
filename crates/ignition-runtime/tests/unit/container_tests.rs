//! Unit tests for the service container.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ignition_domain::value::shared;
use ignition_domain::ServiceFactory;
use ignition_runtime::{App, Container};

#[test]
fn bind_first_wins() {
    let app = App::new();
    let container = Container::new();

    container.bind("greeting", shared("first".to_string()));
    container.bind("greeting", shared("second".to_string()));

    let value = container.get("greeting", &app).unwrap();
    assert_eq!(value.downcast_ref::<String>().unwrap(), "first");
}

#[test]
fn get_unknown_key_is_none() {
    let app = App::new();
    let container = Container::new();
    assert!(container.get("missing", &app).is_none());
    assert!(!container.exists("missing"));
}

#[test]
fn singleton_constructor_invoked_exactly_once() {
    let app = App::new();
    let container = Container::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    container.singleton(
        "service",
        ServiceFactory::constructor(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            shared(42_u32)
        }),
    );

    let first = container.get("service", &app).unwrap();
    let second = container.get("service", &app).unwrap();

    assert!(Arc::ptr_eq(&first, &second), "must return the cached instance");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn singleton_factory_receives_the_application_port() {
    let app = App::new();
    app.bind("dependency", shared(7_u32));
    let container = Container::new();

    container.singleton(
        "service",
        ServiceFactory::with_app(|port| {
            let dep = port.get("dependency").unwrap();
            let value = *dep.downcast_ref::<u32>().unwrap();
            shared(value * 2)
        }),
    );

    let resolved = container.get("service", &app).unwrap();
    assert_eq!(*resolved.downcast_ref::<u32>().unwrap(), 14);
}

#[test]
fn singleton_first_wins() {
    let app = App::new();
    let container = Container::new();

    container.singleton("service", ServiceFactory::constructor(|| shared(1_u32)));
    container.singleton("service", ServiceFactory::constructor(|| shared(2_u32)));

    let value = container.get("service", &app).unwrap();
    assert_eq!(*value.downcast_ref::<u32>().unwrap(), 1);
}

#[test]
fn alias_resolves_to_plain_value() {
    let app = App::new();
    let container = Container::new();

    container.bind("origin", shared("value".to_string()));
    container.alias("origin", "nickname");

    let value = container.get("nickname", &app).unwrap();
    assert_eq!(value.downcast_ref::<String>().unwrap(), "value");
}

#[test]
fn alias_chains_resolve_to_the_original() {
    let app = App::new();
    let container = Container::new();

    container.bind("origin", shared(99_i64));
    container.alias("origin", "first");
    container.alias("first", "second");

    let through_chain = container.get("second", &app).unwrap();
    let direct = container.get("origin", &app).unwrap();
    assert!(Arc::ptr_eq(&through_chain, &direct));
}

#[test]
fn alias_of_singleton_shares_the_memoized_instance() {
    let app = App::new();
    let container = Container::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    container.singleton(
        "origin",
        ServiceFactory::constructor(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            shared(String::from("instance"))
        }),
    );
    container.alias("origin", "nickname");

    let via_alias = container.get("nickname", &app).unwrap();
    let via_origin = container.get("origin", &app).unwrap();

    assert!(Arc::ptr_eq(&via_alias, &via_origin));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn alias_of_unknown_origin_is_a_noop() {
    let app = App::new();
    let container = Container::new();
    container.alias("missing", "nickname");
    assert!(!container.exists("nickname"));
    assert!(container.get("nickname", &app).is_none());
}

#[test]
fn keys_preserve_insertion_order() {
    let container = Container::new();
    container.bind("one", shared(1_u8));
    container.bind("two", shared(2_u8));
    container.bind("three", shared(3_u8));

    assert_eq!(container.keys(), ["one", "two", "three"]);
}

#[test]
fn destroy_selectively_and_in_bulk() {
    let container = Container::new();
    container.bind("one", shared(1_u8));
    container.bind("two", shared(2_u8));
    container.bind("three", shared(3_u8));

    container.destroy(&["two"]);
    assert_eq!(container.keys(), ["one", "three"]);

    container.destroy(&[]);
    assert_eq!(container.count(), 0);
}
