//! Class descriptors forming the ownership chain

use std::sync::Arc;

use crate::types::DefinitionRecord;

/// One class in an ownership (subclassing) chain
///
/// The parent link is fixed at construction, so a chain built from descriptors
/// is always finite and acyclic.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    name: String,
    parent: Option<Arc<ClassDescriptor>>,
    definition: Option<Arc<DefinitionRecord>>,
}

impl ClassDescriptor {
    /// Create a class without a parent
    #[must_use]
    pub fn root(name: impl Into<String>, definition: Option<DefinitionRecord>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            parent: None,
            definition: definition.map(Arc::new),
        })
    }

    /// Create a class that extends `parent`
    #[must_use]
    pub fn derived(
        name: impl Into<String>,
        parent: &Arc<ClassDescriptor>,
        definition: Option<DefinitionRecord>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            parent: Some(Arc::clone(parent)),
            definition: definition.map(Arc::new),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Arc<ClassDescriptor>> {
        self.parent.as_ref()
    }

    /// The record this class declares itself, if any
    #[must_use]
    pub fn definition(&self) -> Option<&DefinitionRecord> {
        self.definition.as_deref()
    }

    /// Number of classes above this one
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            depth += 1;
            current = class.parent.as_deref();
        }
        depth
    }
}
