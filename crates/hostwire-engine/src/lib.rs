//! Hostwire Engine
//!
//! Reflection and dispatch core for calling host objects from script code:
//! - **Catalog**: per-type merged member tables, bean aliases and exact
//!   constructor lookup (`catalog` module)
//! - **Coercion**: registry of value conversions, with derived enum
//!   coercion (`coercion` module)
//! - **Dispatch**: per-type indexed invocation tables (`dispatch` module)
//! - **Bridge**: property access, calls and construction for interpreters
//!   (`bridge` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use hostwire_engine::{HostBridge, InteropConfig};
//! use hostwire_sdk::{HostType, HostValue, MethodDescriptor, TypeBuilder};
//!
//! let greeter = TypeBuilder::class("demo.Greeter")
//!     .method(MethodDescriptor::new("getName", HostType::string(), |_, _| Ok("world".into())))
//!     .build();
//!
//! let bridge = HostBridge::with_config(InteropConfig::default());
//! let obj = HostValue::object(&greeter, ());
//! assert_eq!(bridge.get_property(&obj, "name").unwrap(), HostValue::from("world"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Member catalog: per-type member tables and constructor index
pub mod catalog;

/// Coercion registry and enum coercion
pub mod coercion;

/// Per-type dispatch tables
pub mod dispatch;

/// Interpreter-facing bridge
pub mod bridge;

// ============================================================================
// Support Modules
// ============================================================================

/// Configuration loading
pub mod config;

/// Exposed-name remapping
pub mod remap;

/// Overload identity
pub mod signature;

// ============================================================================
// Re-exports
// ============================================================================

pub use bridge::HostBridge;
pub use catalog::{CatalogEntry, Constructor, FieldBinding, Member, Overload, TypeCatalog};
pub use coercion::{CoercionFactory, CoercionRegistry, CoercionRule, CoercionValidator, EnumCoercion};
pub use config::{InteropConfig, InteropOptions, RemapOptions};
pub use dispatch::{DispatchCache, DispatchEntry, DispatchTable};
pub use remap::{ChainRemapper, NoopRemapper, PrefixRemapper, Remapper};
pub use signature::SignatureKey;
