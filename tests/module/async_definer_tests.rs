//! Async definer tests
//!
//! Tests for definitions handed to an async definer, the forced require used
//! by global modules, and deferred host scheduling.

use std::sync::Arc;

use super::test_utils::*;
use unidef::module::traits::AsyncRequire;
use unidef::{DependencyRef, Factory, HostCapabilities, Mode, Options, RegistrationError, Runtime, Value};

fn definer_runtime(definer: Arc<RecordingDefiner>, require: Option<Arc<dyn AsyncRequire>>) -> Runtime {
    let mut host = HostCapabilities::new().with_async_definer(definer);
    if let Some(require) = require {
        host = host.with_async_require(require);
    }
    Runtime::new(host)
}

#[test]
fn test_definition_shape() {
    let definer = RecordingDefiner::new();
    let runtime = definer_runtime(definer.clone(), None);
    assert_eq!(runtime.mode(), Mode::AsyncDefiner);

    let define = runtime.configure(Options::new());
    let (factory, calls) = recording_factory(Value::Null);
    let result = define
        .register(
            "widget",
            Some(vec!["exports".into(), DependencyRef::pick("jquery", "cheerio")]),
            factory,
        )
        .unwrap();

    assert!(result.is_undefined());
    // The host evaluates factories, not the registrar
    assert!(calls.lock().is_empty());
    assert!(runtime.registry().is_empty());

    let definitions = definer.definitions.lock();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].id.as_deref(), Some("widget"));
    assert_eq!(
        definitions[0].dependencies,
        Some(vec![DependencyRef::named("exports"), DependencyRef::named("jquery")])
    );
    assert!(definitions[0].factory.is_callable());
}

#[test]
fn test_amd_id_and_anonymous() {
    let definer = RecordingDefiner::new();
    let runtime = definer_runtime(definer.clone(), None);

    runtime
        .configure(Options::new().amd_id("lib/widget"))
        .define("widget", Value::from("w"))
        .unwrap();
    runtime
        .configure(Options::new().anonymous())
        .define("anon", Value::from("a"))
        .unwrap();

    let definitions = definer.definitions.lock();
    assert_eq!(definitions[0].id.as_deref(), Some("lib/widget"));
    assert!(definitions[0].dependencies.is_none());
    assert!(definitions[1].id.is_none());
}

#[test]
fn test_global_forces_eager_require() {
    let definer = RecordingDefiner::new();
    let require = EagerRequire::new(definer.clone());
    let runtime = definer_runtime(definer.clone(), Some(require.clone() as Arc<dyn AsyncRequire>));

    runtime
        .configure(Options::new().global())
        .define("math", Factory::from_fn("math", |_| Ok(math_exports())))
        .unwrap();

    assert_eq!(require.requested.lock().as_slice(), &[vec!["math".to_string()]]);
    let registered = runtime.registry().lookup("math").unwrap();
    assert!(runtime.namespace().get("math").unwrap().same_as(&registered));
    assert_eq!(
        registered.as_object().unwrap().call_method("square", &[Value::from(4.0)]).unwrap(),
        Value::from(16.0)
    );
}

#[test]
fn test_global_without_async_require_fails() {
    let definer = RecordingDefiner::new();
    let runtime = definer_runtime(definer.clone(), None);

    let err = runtime
        .configure(Options::new().global())
        .define("math", Factory::from_fn("math", |_| Ok(math_exports())))
        .unwrap_err();

    assert_eq!(err, RegistrationError::MissingAsyncResolver("math".to_string()));
    assert!(definer.definitions.lock().is_empty());
}

#[test]
fn test_deferred_require_publishes_later() {
    let definer = RecordingDefiner::new();
    let require = DeferredRequire::new();
    let runtime = definer_runtime(definer.clone(), Some(require.clone() as Arc<dyn AsyncRequire>));

    runtime
        .configure(Options::new().global())
        .define("late", Value::from("value"))
        .unwrap();

    // Not observable until the host runs the callback
    assert_eq!(require.pending(), 1);
    assert!(!runtime.registry().contains("late"));
    assert!(!runtime.namespace().contains("late"));

    require.flush(&definer);
    assert_eq!(runtime.registry().lookup("late"), Some(Value::from("value")));
    assert_eq!(runtime.namespace().get("late"), Some(Value::from("value")));
}

#[test]
fn test_synchronous_duplicate_is_reported() {
    let definer = RecordingDefiner::new();
    let require = EagerRequire::new(definer.clone());
    let runtime = definer_runtime(definer.clone(), Some(require as Arc<dyn AsyncRequire>));
    let define = runtime.configure(Options::new().global());

    define.define("once", Value::from("first")).unwrap();
    let err = define.define("once", Value::from("second")).unwrap_err();

    assert_eq!(err, RegistrationError::DuplicateRegistration("once".to_string()));
    assert_eq!(runtime.namespace().get("once"), Some(Value::from("first")));
}

#[test]
fn test_definer_without_amd_flag_is_ignored() {
    let definer = Arc::new(RecordingDefiner {
        amd: false,
        definitions: Default::default(),
    });
    let runtime = definer_runtime(definer.clone(), None);
    assert_eq!(runtime.mode(), Mode::SharedNamespace);

    runtime.configure(Options::new()).define("plain", Value::from("p")).unwrap();
    assert!(definer.definitions.lock().is_empty());
    assert!(runtime.registry().contains("plain"));
}

#[test]
fn test_pending_callback_does_not_keep_runtime_alive() {
    let definer = RecordingDefiner::new();
    let require = DeferredRequire::new();
    let runtime = definer_runtime(definer.clone(), Some(require.clone() as Arc<dyn AsyncRequire>));

    runtime
        .configure(Options::new().global())
        .define("orphan", Value::from("value"))
        .unwrap();
    assert_eq!(require.pending(), 1);
    assert_eq!(Arc::strong_count(&definer), 2);

    drop(runtime);
    // Host capabilities were released with the runtime
    assert_eq!(Arc::strong_count(&definer), 1);

    // Running the stale callback is harmless
    require.flush(&definer);
    assert_eq!(require.pending(), 0);
}

#[test]
fn test_literal_dependencies_reach_the_definer() {
    let definer = RecordingDefiner::new();
    let runtime = definer_runtime(definer.clone(), None);
    let literal = Value::from("inline");

    runtime
        .configure(Options::new())
        .register(
            "mixed",
            Some(vec![DependencyRef::Literal(literal.clone()), ("jquery", "cheerio").into()]),
            Value::from("m"),
        )
        .unwrap();

    let definitions = definer.definitions.lock();
    assert_eq!(
        definitions[0].dependencies,
        Some(vec![DependencyRef::Literal(literal), DependencyRef::named("jquery")])
    );
}
