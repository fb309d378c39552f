//! # Definition Composition Core
//!
//! Core types for composing directive and component definition records.
//!
//! This crate provides the data a definition inheritance resolver works on:
//! the [`DefinitionRecord`] consumed by a rendering runtime, the
//! [`ClassDescriptor`] nodes of an ownership chain, configuration and errors.
//! The resolver itself lives in `defcompose-service`.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)]

/// Error types for composition and registration
pub mod error;

/// Definition records and their parts
pub mod types;

/// Ownership chain nodes
pub mod class;

/// Composer configuration
pub mod config;

/// Serializable record snapshots
pub mod summary;

pub use class::ClassDescriptor;
pub use config::{ComposerConfig, RecompositionPolicy};
pub use error::{DefinitionError, Result};
pub use summary::DefinitionSummary;
pub use types::{
    CallbackChain, CallbackEntry, CallbackSlot, DefinitionCallback, DefinitionFeature,
    DefinitionKind, DefinitionRecord, HookFn, InputDeclaration, LifecycleHook, LifecycleHooks,
    OutputDeclaration, RenderFlags,
};
