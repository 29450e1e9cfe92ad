//! Registration tests
//!
//! Tests for the registration entry point under the shared-namespace host:
//! duplicate names, specials, constant modules and registrar sharing.

use super::test_utils::*;
use unidef::module::registry::NO_CONFLICT_KEY;
use unidef::{DependencyRef, Factory, Object, Options, RegistrationError, Value};

#[test]
fn test_math_scenario() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new().global());

    let deps: Vec<DependencyRef> = vec!["require".into(), "exports".into(), "module".into()];
    define
        .register("math", Some(deps), Factory::from_fn("math", |_| Ok(math_exports())))
        .unwrap();

    let registered = runtime.registry().lookup("math").unwrap();
    let published = runtime.namespace().get("math").unwrap();
    assert!(registered.same_as(&published));

    let square = registered.as_object().unwrap();
    assert_eq!(square.call_method("square", &[Value::from(4.0)]).unwrap(), Value::from(16.0));
    let square = published.as_object().unwrap();
    assert_eq!(square.call_method("square", &[Value::from(4.0)]).unwrap(), Value::from(16.0));
}

#[test]
fn test_duplicate_registration_keeps_first() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new());

    let first = define
        .define("dup", Factory::from_fn("first", |_| Ok(Value::Object(Object::new()))))
        .unwrap();

    let (second, calls) = recording_factory(Value::from("second"));
    let err = define.define("dup", second).unwrap_err();

    assert_eq!(err, RegistrationError::DuplicateRegistration("dup".to_string()));
    // The factory ran: only insertion is refused
    assert_eq!(calls.lock().len(), 1);
    assert!(runtime.registry().lookup("dup").unwrap().same_as(&first));
}

#[test]
fn test_default_dependencies_are_the_three_specials() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new());
    let (factory, calls) = recording_factory(Value::Null);

    define.define("probe", factory).unwrap();

    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    assert_eq!(args.len(), 3);

    // require: the active resolver
    assert!(args[0].is_callable());
    // exports: fresh empty record
    assert!(args[1].as_object().unwrap().is_empty());
    // module: the shared namespace handle
    assert!(args[2].same_as(&runtime.namespace().as_value()));
}

#[test]
fn test_require_special_resolves_registered_modules() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new());
    define.define("math", Factory::from_fn("math", |_| Ok(math_exports()))).unwrap();

    let result = define
        .define(
            "consumer",
            Factory::from_fn("consumer", |args| {
                let math = args[0].call(&[Value::from("lib/math")])?;
                math.as_object().unwrap().call_method("square", &[Value::from(3.0)])
            }),
        )
        .unwrap();
    assert_eq!(result, Value::from(9.0));
}

#[test]
fn test_falsy_result_registers_empty_record() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new().global());

    let result = define.define("nothing", Factory::from_fn("nothing", |_| Ok(Value::Undefined))).unwrap();

    assert!(result.is_undefined());
    let stored = runtime.registry().lookup("nothing").unwrap();
    assert!(stored.as_object().unwrap().is_empty());
    // Falsy exports are never published
    assert!(!runtime.namespace().contains("nothing"));
}

#[test]
fn test_constant_module_is_registered_verbatim() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new().global());
    let config = Value::Object(Object::from_fields([("debug", Value::from(true))]));

    let returned = define
        .register("settings", Some(vec!["missing_module".into()]), config.clone())
        .unwrap();

    // No resolution attempted: the missing dependency is never looked up
    assert!(returned.same_as(&config));
    assert!(runtime.registry().lookup("settings").unwrap().same_as(&config));
    assert!(runtime.namespace().get("settings").unwrap().same_as(&config));
}

#[test]
fn test_registrars_share_one_registry() {
    let runtime = shared_runtime();
    let private = runtime.configure(Options::new());
    let global = runtime.configure(Options::new().global().no_conflict());

    private.define("util", Value::from("util")).unwrap();
    let exports = global
        .register(
            "app",
            Some(vec!["util".into()]),
            Factory::from_fn("app", |args| {
                Ok(Value::Object(Object::from_fields([("util", args[0].clone())])))
            }),
        )
        .unwrap();

    assert_eq!(exports.get("util"), Some(Value::from("util")));
    assert!(exports.as_object().unwrap().contains_key(NO_CONFLICT_KEY));
    assert_eq!(runtime.registry().names(), vec!["app".to_string(), "util".to_string()]);
    assert!(!runtime.namespace().contains("util"));
}

#[test]
fn test_factory_error_aborts_registration() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new());

    let err = define
        .define(
            "broken",
            Factory::from_fn("broken", |_| Err(RegistrationError::Factory("boom".to_string()))),
        )
        .unwrap_err();

    assert_eq!(err, RegistrationError::Factory("boom".to_string()));
    assert!(!runtime.registry().contains("broken"));
}

#[test]
fn test_namespace_renders_despite_module_handle_cycle() {
    let runtime = shared_runtime();
    let define = runtime.configure(Options::new().global());

    define
        .register(
            "selfref",
            Some(vec!["module".into()]),
            Factory::from_fn("selfref", |args| {
                Ok(Value::Object(Object::from_fields([("host", args[0].clone())])))
            }),
        )
        .unwrap();

    let json = runtime.namespace().as_value().to_json();
    assert_eq!(json["selfref"]["host"], serde_json::json!("[circular]"));
}
