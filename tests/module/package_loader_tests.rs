//! Package loader tests
//!
//! Tests for registration under a synchronous package loader: export
//! replacement, the exports/module specials and host require delegation.

use std::collections::HashMap;

use super::test_utils::*;
use unidef::{Factory, Mode, Object, Options, Value};

#[test]
fn test_truthy_result_replaces_exports() {
    let package = MockPackage::new(HashMap::new());
    let runtime = package_runtime(package.clone());
    assert_eq!(runtime.mode(), Mode::PackageLoader);

    let result = runtime
        .configure(Options::new())
        .define("math", Factory::from_fn("math", |_| Ok(math_exports())))
        .unwrap();

    assert!(package.exported().same_as(&result));
    assert_eq!(
        package.exported().as_object().unwrap().call_method("square", &[Value::from(5.0)]).unwrap(),
        Value::from(25.0)
    );
    // The package loader owns registration
    assert!(runtime.registry().is_empty());
}

#[test]
fn test_exports_special_accumulates() {
    let package = MockPackage::new(HashMap::new());
    let runtime = package_runtime(package.clone());

    let result = runtime
        .configure(Options::new())
        .register(
            "helpers",
            Some(vec!["exports".into()]),
            Factory::from_fn("helpers", |args| {
                args[0].as_object().unwrap().set("version", Value::from("1.0"));
                Ok(Value::Undefined)
            }),
        )
        .unwrap();

    assert!(result.is_undefined());
    assert!(package.exported().same_as(&Value::Object(package.exports.clone())));
    assert_eq!(package.exports.get("version"), Some(Value::from("1.0")));
}

#[test]
fn test_module_special_is_host_handle() {
    let package = MockPackage::new(HashMap::new());
    let runtime = package_runtime(package.clone());
    let (factory, calls) = recording_factory(Value::Null);

    runtime
        .configure(Options::new())
        .register("m", Some(vec!["module".into()]), factory)
        .unwrap();

    assert!(calls.lock()[0][0].same_as(&Value::Object(package.handle.clone())));
    // Null is falsy: exports keep their initial value
    assert!(package.exported().same_as(&Value::Object(package.exports.clone())));
}

#[test]
fn test_constant_module_becomes_exports() {
    let package = MockPackage::new(HashMap::new());
    let runtime = package_runtime(package.clone());
    let settings = Value::Object(Object::from_fields([("level", Value::from(3.0))]));

    let returned = runtime
        .configure(Options::new())
        .register("settings", Some(vec!["missing".into()]), settings.clone())
        .unwrap();

    assert!(returned.same_as(&settings));
    assert!(package.exported().same_as(&settings));
    assert_eq!(package.require_count(), 0);
}

#[test]
fn test_require_special_delegates_to_host() {
    let package = MockPackage::new(HashMap::from([("path".to_string(), Value::from("path-module"))]));
    let runtime = package_runtime(package.clone());

    let result = runtime
        .configure(Options::new())
        .define(
            "loader",
            Factory::from_fn("loader", |args| args[0].call(&[Value::from("path")])),
        )
        .unwrap();

    assert_eq!(result, Value::from("path-module"));
    assert_eq!(package.exported(), Value::from("path-module"));
    assert_eq!(package.require_count(), 1);
}

#[test]
fn test_global_option_does_not_publish() {
    let package = MockPackage::new(HashMap::new());
    let runtime = package_runtime(package);

    runtime
        .configure(Options::new().global())
        .define("quiet", Factory::from_fn("quiet", |_| Ok(math_exports())))
        .unwrap();

    assert!(!runtime.namespace().contains("quiet"));
}
