//! Class registration with compose-before-first-use
//!
//! Stands in for static class initialization: each class is declared once, in
//! parent-before-child order, and its definition record is composed as part of
//! the declaration. Readers only ever see composed records.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use defcompose_core::{
    ClassDescriptor, ComposerConfig, DefinitionError, DefinitionRecord, Result,
};

use crate::composer::DefinitionComposer;
use crate::walker::AncestorChainWalker;

/// Registry of declared classes and their composed definition records
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    composer: DefinitionComposer,
    classes: IndexMap<String, Arc<ClassDescriptor>>,
    composed: IndexMap<String, Arc<DefinitionRecord>>,
}

impl DefinitionRegistry {
    /// Create a new registry
    #[must_use]
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            composer: DefinitionComposer::new(config),
            classes: IndexMap::new(),
            composed: IndexMap::new(),
        }
    }

    /// Declare a class, composing its record against the chain above it
    ///
    /// `record` is the class's own record as emitted by the compiler, or
    /// `None` for a class that declares no metadata. The class is only
    /// registered if composition succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, the parent is not registered, or
    /// the record cannot be composed.
    pub fn define(
        &mut self,
        name: &str,
        parent: Option<&str>,
        record: Option<DefinitionRecord>,
    ) -> Result<Arc<ClassDescriptor>> {
        if self.classes.contains_key(name) {
            return Err(DefinitionError::DuplicateClass(name.to_string()));
        }

        let class = match parent {
            None => ClassDescriptor::root(name, record),
            Some(parent_name) => {
                let parent_class = self.classes.get(parent_name).ok_or_else(|| {
                    DefinitionError::unknown_class_in(parent_name, format!("parent of {name}"))
                })?;
                ClassDescriptor::derived(name, parent_class, record)
            }
        };

        if let Some(composed) = self.composer.compose_class(&class)? {
            self.composed.insert(name.to_string(), Arc::new(composed));
        }
        self.classes.insert(name.to_string(), Arc::clone(&class));
        debug!("Registered class {name} at depth {}", class.depth());

        Ok(class)
    }

    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Arc<ClassDescriptor>> {
        self.classes.get(name)
    }

    /// The composed record for a class, shared with every reader
    #[must_use]
    pub fn composed(&self, name: &str) -> Option<Arc<DefinitionRecord>> {
        self.composed.get(name).cloned()
    }

    /// The record a class declared itself, before composition
    #[must_use]
    pub fn declared(&self, name: &str) -> Option<&DefinitionRecord> {
        self.classes.get(name).and_then(|class| class.definition())
    }

    /// Names of the ancestors of `name` that own a record, nearest first
    ///
    /// # Errors
    ///
    /// Returns an error if the class is not registered.
    pub fn ancestors(&self, name: &str) -> Result<Vec<String>> {
        let class = self.require(name)?;
        Ok(AncestorChainWalker::new(class)
            .map(|(ancestor, _)| ancestor.name().to_string())
            .collect())
    }

    /// Check if `ancestor` appears anywhere above `child`, or is `child` itself
    ///
    /// # Errors
    ///
    /// Returns an error if either class is not registered.
    pub fn is_descendant_of(&self, child: &str, ancestor: &str) -> Result<bool> {
        let mut current = Some(Arc::as_ref(self.require(child)?));
        self.require(ancestor)?;

        while let Some(class) = current {
            if class.name() == ancestor {
                return Ok(true);
            }
            current = class.parent().map(Arc::as_ref);
        }
        Ok(false)
    }

    /// Registered class names in declaration order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn require(&self, name: &str) -> Result<&Arc<ClassDescriptor>> {
        self.classes
            .get(name)
            .ok_or_else(|| DefinitionError::unknown_class(name))
    }
}
