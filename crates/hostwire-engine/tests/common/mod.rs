//! Shared host type fixtures for integration tests
//!
//! ```text
//! Named (interface)       Animal
//!   getName()               legs (final), isAlive(), speak(), feed(long),
//!                           describe(), getSecret() [hidden]
//!          \               /
//!           Dog extends Animal implements Named
//!             age, speak(), getColor()/setColor(Color), setNickname(String),
//!             fetch(String, int); constructors () and (String)
//!
//! Color (enum): RED, GREEN, BLUE
//! ```

#![allow(dead_code)]

use hostwire_sdk::{
    ConstructorDescriptor, FieldDescriptor, FromHost, HostType, HostValue, InteropError,
    InteropResult, MethodDescriptor, ToHost, TypeBuilder,
};
use parking_lot::Mutex;

/// Backing state of a `zoo.Dog` instance
pub struct Pet {
    pub name: String,
    pub age: Mutex<i64>,
    pub color: Mutex<HostValue>,
    pub nickname: Mutex<Option<String>>,
}

impl Pet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            age: Mutex::new(3),
            color: Mutex::new(HostValue::Null),
            nickname: Mutex::new(None),
        }
    }
}

pub fn pet(receiver: &HostValue) -> InteropResult<&Pet> {
    receiver
        .as_object()
        .and_then(|o| o.downcast_ref::<Pet>())
        .ok_or_else(|| InteropError::Host(format!("{:?} is not a pet", receiver)))
}

pub struct Zoo {
    pub named: HostType,
    pub animal: HostType,
    pub dog: HostType,
    pub color: HostType,
}

impl Zoo {
    pub fn new() -> Self {
        let color = TypeBuilder::enumeration("zoo.Color")
            .constant("RED")
            .constant("GREEN")
            .constant("BLUE")
            .build();

        let named = TypeBuilder::interface("zoo.Named")
            .method(MethodDescriptor::new("getName", HostType::string(), |r, _| {
                Ok(pet(r)?.name.as_str().into())
            }))
            .build();

        let animal = TypeBuilder::class("zoo.Animal")
            .field(
                FieldDescriptor::new("legs", HostType::int(), |_| Ok(HostValue::Int(4))).as_final(),
            )
            .method(MethodDescriptor::new("isAlive", HostType::boolean(), |_, _| {
                Ok(HostValue::Bool(true))
            }))
            .method(MethodDescriptor::new("speak", HostType::string(), |_, _| Ok("...".into())))
            .method(
                MethodDescriptor::new("feed", HostType::long(), |_, args| {
                    Ok((i64::from_host(&args[0])? * 2).to_host())
                })
                .with_params([HostType::long()]),
            )
            .method(MethodDescriptor::new("describe", HostType::string(), |_, _| {
                Ok("an animal".into())
            }))
            .method(
                MethodDescriptor::new("getSecret", HostType::string(), |_, _| Ok("hunter2".into()))
                    .as_hidden(),
            )
            .build();

        let dog = TypeBuilder::class("zoo.Dog")
            .extends(&animal)
            .implements(&named)
            .field(
                FieldDescriptor::new("age", HostType::int(), |r| {
                    Ok(HostValue::Int(*pet(r)?.age.lock()))
                })
                .with_setter(|r, v| {
                    *pet(r)?.age.lock() = i64::from_host(&v)?;
                    Ok(())
                }),
            )
            .method(MethodDescriptor::new("speak", HostType::string(), |_, _| Ok("Woof".into())))
            .method(MethodDescriptor::new("getColor", color.clone(), |r, _| {
                Ok(pet(r)?.color.lock().clone())
            }))
            .method(
                MethodDescriptor::new("setColor", HostType::void(), |r, args| {
                    *pet(r)?.color.lock() = args[0].clone();
                    Ok(HostValue::Null)
                })
                .with_params([color.clone()]),
            )
            .method(
                MethodDescriptor::new("setNickname", HostType::void(), |r, args| {
                    *pet(r)?.nickname.lock() = args[0].as_str().map(str::to_string);
                    Ok(HostValue::Null)
                })
                .with_params([HostType::string()]),
            )
            .method(
                MethodDescriptor::new("fetch", HostType::string(), |r, args| {
                    let item = String::from_host(&args[0])?;
                    let times = i32::from_host(&args[1])?;
                    Ok(format!("{} fetched {} x{}", pet(r)?.name, item, times).to_host())
                })
                .with_params([HostType::string(), HostType::int()]),
            )
            .constructor(ConstructorDescriptor::new(|ty, _| {
                Ok(HostValue::object(ty, Pet::new("Rex")))
            }))
            .constructor(
                ConstructorDescriptor::new(|ty, args| {
                    Ok(HostValue::object(ty, Pet::new(args[0].as_str().unwrap_or("?"))))
                })
                .with_params([HostType::string()]),
            )
            .build();

        Self {
            named,
            animal,
            dog,
            color,
        }
    }

    /// A fresh dog instance
    pub fn dog(&self, name: &str) -> HostValue {
        HostValue::object(&self.dog, Pet::new(name))
    }

    /// Enumerant of `zoo.Color` by ordinal
    pub fn color(&self, ordinal: usize) -> HostValue {
        HostValue::Enum(self.color.enum_constants()[ordinal].clone())
    }
}
