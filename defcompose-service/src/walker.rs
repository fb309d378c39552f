//! Ownership chain traversal

use std::sync::Arc;

use defcompose_core::{ClassDescriptor, DefinitionRecord};

/// Iterates the ancestors of a class that own a definition record
///
/// Yields `(class, record)` pairs from the immediate parent up to the root.
/// Classes without a record are skipped and the walk carries on above them.
#[derive(Debug, Clone)]
pub struct AncestorChainWalker<'a> {
    next: Option<&'a ClassDescriptor>,
}

impl<'a> AncestorChainWalker<'a> {
    /// Start walking above `leaf`; the leaf itself is never yielded
    #[must_use]
    pub fn new(leaf: &'a ClassDescriptor) -> Self {
        Self {
            next: leaf.parent().map(Arc::as_ref),
        }
    }
}

impl<'a> Iterator for AncestorChainWalker<'a> {
    type Item = (&'a ClassDescriptor, &'a DefinitionRecord);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(class) = self.next {
            self.next = class.parent().map(Arc::as_ref);
            if let Some(record) = class.definition() {
                return Some((class, record));
            }
        }
        None
    }
}
