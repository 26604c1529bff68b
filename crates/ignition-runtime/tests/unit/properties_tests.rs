//! Unit tests for the property store and default properties.

use ignition_domain::value::shared;
use ignition_domain::{keys, RunMode};
use ignition_runtime::{DefaultProps, PropertyStore};

#[test]
fn put_get_and_replace() {
    let store = PropertyStore::new();
    assert!(store.get("key").is_none());

    store.put("key", shared("one".to_string()));
    store.put("key", shared("two".to_string()));

    let value = store.get("key").unwrap();
    assert_eq!(value.downcast_ref::<String>().unwrap(), "two");
}

#[test]
fn flags_default_to_false() {
    let store = PropertyStore::new();
    assert!(!store.flag("missing"));

    store.put("present", shared(true));
    assert!(store.flag("present"));

    store.put("wrong_type", shared("yes".to_string()));
    assert!(!store.flag("wrong_type"));
}

#[test]
fn counters_only_increase() {
    let store = PropertyStore::new();
    assert_eq!(store.counter("n"), 0);
    assert_eq!(store.incr("n"), 1);
    assert_eq!(store.incr("n"), 2);
    assert_eq!(store.incr("n"), 3);
    assert_eq!(store.counter("n"), 3);
}

#[test]
fn phase_state_keys() {
    let store = PropertyStore::new();
    assert_eq!(PropertyStore::state_key("register"), "init_register_state");

    assert!(!store.is_init("register"));
    store.set_init("register");
    assert!(store.is_init("register"));
    assert!(!store.is_init("boot"));
}

#[test]
fn defaults_answer_well_known_keys_and_synonyms() {
    let defaults = DefaultProps {
        app_name: "app".into(),
        version: "1.0.0".into(),
        base_path: "/srv/app".into(),
        run_mode: RunMode::Test,
        config_dir: "/srv/app/configs".into(),
        config_suffixes: vec![".toml".into()],
    };

    for key in [keys::APP_NAME, "appname", "app_name"] {
        let value = defaults.get(key).unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "app");
    }

    let mode = defaults.get(keys::RUN_MODE).unwrap();
    assert_eq!(*mode.downcast_ref::<RunMode>().unwrap(), RunMode::Test);

    assert!(defaults.get("unknown").is_none());
}

#[test]
fn defaults_foreach_visits_every_canonical_key() {
    let defaults = DefaultProps {
        app_name: "app".into(),
        version: "1.0.0".into(),
        base_path: "/srv/app".into(),
        run_mode: RunMode::Dev,
        config_dir: "/srv/app/configs".into(),
        config_suffixes: vec![".toml".into()],
    };

    let mut seen = Vec::new();
    defaults.for_each(|key, _| {
        seen.push(key.to_string());
        true
    });
    assert_eq!(seen.len(), DefaultProps::keys().len());
}
