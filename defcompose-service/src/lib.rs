//! # Definition Composition Service
//!
//! Definition inheritance resolver for directive and component records.
//!
//! Given a class in a linear ownership chain and the definition record it
//! declares, the resolver walks the chain, finds every ancestor that owns a
//! record, and folds those records into the leaf's record in place. The result
//! is self-contained: the rendering runtime never consults the chain again.
//!
//! ```
//! use defcompose_core::{ClassDescriptor, DefinitionRecord, InputDeclaration};
//! use defcompose_service::DefinitionComposer;
//!
//! let parent = ClassDescriptor::root(
//!     "SuperDirective",
//!     Some(
//!         DefinitionRecord::directive("SuperDirective")
//!             .with_input(InputDeclaration::new("foo")),
//!     ),
//! );
//! let leaf = ClassDescriptor::derived("SubDirective", &parent, None);
//!
//! let mut record = DefinitionRecord::directive("SubDirective");
//! DefinitionComposer::default().compose(&mut record, &leaf)?;
//! assert!(record.inputs.contains_key("foo"));
//! # Ok::<(), defcompose_core::DefinitionError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Ownership chain traversal
pub mod walker;

/// Per-field merge strategies
pub mod policies;

/// Composition orchestration and validation
pub mod composer;

/// Class declaration with compose-before-first-use
pub mod registry;

pub use composer::DefinitionComposer;
pub use policies::{
    AppendDistinct, ComposeCallbacks, FillAbsentKeys, FirstPresent, MergePolicy, SumCounts,
    fold_ancestor,
};
pub use registry::DefinitionRegistry;
pub use walker::AncestorChainWalker;

pub use defcompose_core::{ComposerConfig, DefinitionError, DefinitionRecord, Result};
