//! Host bridge integration tests
//!
//! End-to-end property access, method calls and construction through
//! [`HostBridge`], with and without fast dispatch.
//!
//! # Running Tests
//! ```bash
//! cargo test --test bridge_tests
//! ```

mod common;

use std::sync::Arc;

use common::{pet, Pet, Zoo};
use hostwire_engine::{HostBridge, InteropConfig, Remapper, SignatureKey};
use hostwire_sdk::{HostType, HostValue, InteropError, MethodDescriptor, TypeBuilder};

fn bridges() -> Vec<HostBridge> {
    let mut direct = InteropConfig::default();
    direct.interop.fast_dispatch = false;
    vec![HostBridge::default(), HostBridge::with_config(direct)]
}

// ===== Properties =====

#[test]
fn test_get_property() {
    let zoo = Zoo::new();
    for bridge in bridges() {
        let rex = zoo.dog("Rex");
        assert_eq!(bridge.get_property(&rex, "name").unwrap(), HostValue::from("Rex"));
        assert_eq!(bridge.get_property(&rex, "legs").unwrap(), HostValue::Int(4));
        assert_eq!(bridge.get_property(&rex, "age").unwrap(), HostValue::Int(3));
        assert_eq!(bridge.get_property(&rex, "alive").unwrap(), HostValue::Bool(true));
        assert!(bridge.get_property(&rex, "color").unwrap().is_null());

        assert_eq!(
            bridge.get_property(&rex, "secret").unwrap_err(),
            InteropError::NoSuchMember {
                type_name: "zoo.Dog".to_string(),
                name: "secret".to_string()
            }
        );
    }
}

#[test]
fn test_set_property() {
    let zoo = Zoo::new();
    for bridge in bridges() {
        let rex = zoo.dog("Rex");

        bridge.set_property(&rex, "age", HostValue::Number(7.0)).unwrap();
        assert_eq!(*pet(&rex).unwrap().age.lock(), 7);

        bridge.set_property(&rex, "color", "Blue".into()).unwrap();
        assert_eq!(bridge.get_property(&rex, "color").unwrap(), zoo.color(2));

        bridge.set_property(&rex, "color", HostValue::Int(0)).unwrap();
        assert_eq!(bridge.get_property(&rex, "color").unwrap(), zoo.color(0));

        bridge.set_property(&rex, "nickname", "Rexy".into()).unwrap();
        assert_eq!(pet(&rex).unwrap().nickname.lock().as_deref(), Some("Rexy"));
    }
}

#[test]
fn test_set_property_errors() {
    let zoo = Zoo::new();
    let bridge = HostBridge::default();
    let rex = zoo.dog("Rex");

    assert!(matches!(
        bridge.set_property(&rex, "legs", HostValue::Int(3)),
        Err(InteropError::ReadOnlyProperty { .. })
    ));
    assert!(matches!(
        bridge.set_property(&rex, "alive", HostValue::Bool(false)),
        Err(InteropError::ReadOnlyProperty { .. })
    ));
    assert!(matches!(
        bridge.set_property(&rex, "age", "old".into()),
        Err(InteropError::TypeMismatch { .. })
    ));
    assert!(matches!(
        bridge.set_property(&rex, "color", "purple".into()),
        Err(InteropError::Value(_))
    ));
    assert!(matches!(
        bridge.set_property(&rex, "tail", HostValue::Int(1)),
        Err(InteropError::NoSuchMember { .. })
    ));
}

// ===== Methods =====

#[test]
fn test_call_method() {
    let zoo = Zoo::new();
    for bridge in bridges() {
        let rex = zoo.dog("Rex");
        assert_eq!(bridge.call_method(&rex, "speak", &[]).unwrap(), HostValue::from("Woof"));
        assert_eq!(
            bridge.call_method(&rex, "feed", &[HostValue::Int(21)]).unwrap(),
            HostValue::Int(42)
        );
        assert_eq!(
            bridge
                .call_method(&rex, "fetch", &["stick".into(), HostValue::Number(2.0)])
                .unwrap(),
            HostValue::from("Rex fetched stick x2")
        );
        assert!(bridge
            .call_method(&rex, "setColor", &["green".into()])
            .unwrap()
            .is_null());
        assert_eq!(bridge.call_method(&rex, "getColor", &[]).unwrap(), zoo.color(1));
    }
}

#[test]
fn test_call_method_errors() {
    let zoo = Zoo::new();
    let bridge = HostBridge::default();
    let rex = zoo.dog("Rex");

    assert_eq!(
        bridge.call_method(&rex, "fetch", &["stick".into()]).unwrap_err(),
        InteropError::NoMatchingOverload {
            type_name: "zoo.Dog".to_string(),
            name: "fetch".to_string(),
            arg_count: 1
        }
    );
    assert!(matches!(
        bridge.call_method(&rex, "fetch", &[HostValue::Int(1), HostValue::Int(2)]),
        Err(InteropError::NoMatchingOverload { .. })
    ));
    assert!(matches!(
        bridge.call_method(&rex, "getSecret", &[]),
        Err(InteropError::NoSuchMember { .. })
    ));
    assert!(matches!(
        bridge.call_method(&HostValue::Null, "speak", &[]),
        Err(InteropError::TypeMismatch { .. })
    ));
}

#[test]
fn test_fast_dispatch_builds_tables_lazily() {
    let zoo = Zoo::new();
    let bridge = HostBridge::default();
    let rex = zoo.dog("Rex");

    assert!(!bridge.dispatch().is_built(&zoo.dog));
    bridge.call_method(&rex, "speak", &[]).unwrap();
    bridge.call_method(&rex, "describe", &[]).unwrap();
    assert!(bridge.dispatch().is_built(&zoo.dog));
    assert_eq!(bridge.dispatch().built_count(), 1);

    let mut direct = InteropConfig::default();
    direct.interop.fast_dispatch = false;
    let bridge = HostBridge::with_config(direct);
    bridge.call_method(&rex, "speak", &[]).unwrap();
    assert_eq!(bridge.dispatch().built_count(), 0);
}

#[test]
fn test_call_static_skips_instance_overloads() {
    let ty = TypeBuilder::class("demo.Registry")
        .method(MethodDescriptor::new("whoami", HostType::string(), |r, _| {
            Ok(format!("receiver={:?}", r).into())
        }))
        .method(
            MethodDescriptor::new("whoami", HostType::string(), |_, args| {
                Ok(format!("static {}", args[0].as_str().unwrap_or_default()).into())
            })
            .with_params([HostType::string()])
            .as_static(),
        )
        .build();
    let instance = HostValue::object(&ty, ());

    for bridge in bridges() {
        assert_eq!(
            bridge.call_static(&ty, "whoami", &[]).unwrap_err(),
            InteropError::NoMatchingOverload {
                type_name: "demo.Registry".to_string(),
                name: "whoami".to_string(),
                arg_count: 0
            }
        );
        assert_eq!(
            bridge.call_static(&ty, "whoami", &["x".into()]).unwrap(),
            HostValue::from("static x")
        );
        assert_ne!(
            bridge.call_method(&instance, "whoami", &[]).unwrap(),
            HostValue::from("receiver=null")
        );
    }
}

#[test]
fn test_registered_coercion_selects_overload() {
    let zoo = Zoo::new();
    let bridge = HostBridge::default();
    let dog = zoo.dog.clone();
    let kennel = TypeBuilder::class("zoo.Kennel")
        .method(
            MethodDescriptor::new("admit", HostType::string(), |_, args| {
                Ok(format!("{} admitted", pet(&args[0])?.name).into())
            })
            .with_params([dog])
            .as_static(),
        )
        .build();

    assert!(matches!(
        bridge.call_static(&kennel, "admit", &["Fido".into()]),
        Err(InteropError::NoMatchingOverload { .. })
    ));

    bridge
        .coercions()
        .register_validated(
            &zoo.dog,
            |value, _| value.is_text(),
            |value, ty| Ok(HostValue::object(ty, Pet::new(value.as_str().unwrap_or_default()))),
        )
        .unwrap();

    assert_eq!(
        bridge.call_static(&kennel, "admit", &["Fido".into()]).unwrap(),
        HostValue::from("Fido admitted")
    );
    assert_eq!(
        bridge.call_static(&kennel, "admit", &[zoo.dog("Rex")]).unwrap(),
        HostValue::from("Rex admitted")
    );
}

// ===== Construction =====

#[test]
fn test_construct() {
    let zoo = Zoo::new();
    let bridge = HostBridge::default();

    let rex = bridge.construct(&zoo.dog, &SignatureKey::empty(), &[]).unwrap();
    assert_eq!(bridge.get_property(&rex, "name").unwrap(), HostValue::from("Rex"));

    let fido = bridge
        .construct(&zoo.dog, &SignatureKey::new([HostType::string()]), &["Fido".into()])
        .unwrap();
    assert_eq!(bridge.call_method(&fido, "getName", &[]).unwrap(), HostValue::from("Fido"));
}

#[test]
fn test_construct_errors() {
    let zoo = Zoo::new();
    let bridge = HostBridge::default();

    assert_eq!(
        bridge
            .construct(&zoo.dog, &SignatureKey::new([HostType::int()]), &[HostValue::Int(1)])
            .unwrap_err(),
        InteropError::NoSuchConstructor {
            type_name: "zoo.Dog".to_string(),
            signature: "int".to_string()
        }
    );
    assert!(matches!(
        bridge.construct(&zoo.dog, &SignatureKey::new([HostType::string()]), &[]),
        Err(InteropError::Argument(_))
    ));
}

// ===== Configuration =====

#[test]
fn test_config_controls_remapping_and_beans() {
    let config = InteropConfig::from_toml_str(
        r#"
        [interop]
        bean_properties = false

        [remap]
        strip_prefixes = ["js_"]
        "#,
    )
    .unwrap();
    let bridge = HostBridge::with_config(config);
    let ty = TypeBuilder::class("demo.Widget")
        .method(MethodDescriptor::new("js_getSize", HostType::int(), |_, _| Ok(HostValue::Int(9))))
        .build();
    let widget = HostValue::object(&ty, ());

    assert_eq!(bridge.call_method(&widget, "getSize", &[]).unwrap(), HostValue::Int(9));
    assert!(matches!(
        bridge.get_property(&widget, "size"),
        Err(InteropError::NoSuchMember { .. })
    ));
}

#[test]
fn test_custom_remapper_runs_first() {
    struct Mapped;

    impl Remapper for Mapped {
        fn remap_method(&self, _ty: &HostType, name: &str) -> Option<String> {
            (name == "m_1001").then(|| "bark".to_string())
        }
    }

    let mut config = InteropConfig::default();
    config.remap.strip_prefixes = vec!["m_".to_string()];
    let bridge = HostBridge::new(config, Arc::new(Mapped));
    let ty = TypeBuilder::class("demo.Obf")
        .method(MethodDescriptor::new("m_1001", HostType::string(), |_, _| Ok("arf".into())))
        .method(MethodDescriptor::new("m_sit", HostType::string(), |_, _| Ok("sat".into())))
        .build();
    let obj = HostValue::object(&ty, ());

    assert_eq!(bridge.call_method(&obj, "bark", &[]).unwrap(), HostValue::from("arf"));
    assert_eq!(bridge.call_method(&obj, "sit", &[]).unwrap(), HostValue::from("sat"));
}
