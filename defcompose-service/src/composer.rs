//! Definition composition
//!
//! Folds the records of every ancestor that owns one into a leaf record, once,
//! before the leaf is first used by the rendering runtime.

use tracing::{debug, trace, warn};

use defcompose_core::{
    ClassDescriptor, ComposerConfig, DefinitionError, DefinitionKind, DefinitionRecord,
    RecompositionPolicy, Result,
};

use crate::policies::fold_ancestor;
use crate::walker::AncestorChainWalker;

/// Composes definition records along an ownership chain
#[derive(Debug, Clone, Default)]
pub struct DefinitionComposer {
    config: ComposerConfig,
}

impl DefinitionComposer {
    /// Create a new composer
    #[must_use]
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Fold the ancestors of `class` into `record` in place
    ///
    /// `record` is the leaf's own record with only its declared fields set;
    /// `class` is the leaf's position in the ownership chain. Ancestor records
    /// are only read. Fields are folded up to and including the nearest
    /// ancestor record that is already composed; the whole chain is still
    /// checked and searched for inheritable features. On failure `record` is
    /// left exactly as it was passed in.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DirectiveExtendsComponent`] if `record` is a
    /// directive and any ancestor is a component, and
    /// [`DefinitionError::AlreadyComposed`] if the record was composed before
    /// and the configuration rejects recomposition.
    pub fn compose(&self, record: &mut DefinitionRecord, class: &ClassDescriptor) -> Result<()> {
        if record.is_composed() {
            return match self.config.recomposition {
                RecompositionPolicy::Ignore => {
                    warn!(
                        "Ignoring second composition request for {}",
                        record.type_name
                    );
                    Ok(())
                }
                RecompositionPolicy::Reject => {
                    Err(DefinitionError::AlreadyComposed(record.type_name.clone()))
                }
            };
        }

        let ancestors: Vec<_> = AncestorChainWalker::new(class).collect();
        Self::check_structure(record, &ancestors)?;

        debug!(
            "Composing {} {} with {} ancestor definition(s)",
            record.kind,
            record.type_name,
            ancestors.len()
        );

        // A composed ancestor already carries everything above it
        let folded = ancestors
            .iter()
            .position(|(_, ancestor)| ancestor.is_composed())
            .map_or(ancestors.len(), |index| index + 1);
        if folded < ancestors.len() {
            debug!(
                "Stopping field merge for {} at composed ancestor {}",
                record.type_name,
                ancestors[folded - 1].0.name()
            );
        }

        for (ancestor_class, ancestor) in &ancestors[..folded] {
            if self.config.trace_merges {
                trace!(
                    "Folding {} {} into {}",
                    ancestor.kind,
                    ancestor_class.name(),
                    record.type_name
                );
            }
            fold_ancestor(record, ancestor);
        }

        if self.config.inherit_features && record.kind.is_renderable() {
            for (ancestor_class, ancestor) in &ancestors {
                if !ancestor.kind.is_renderable() {
                    continue;
                }
                for feature in ancestor.features.iter().filter(|f| f.inherit) {
                    trace!(
                        "Applying feature {} inherited from {}",
                        feature.name,
                        ancestor_class.name()
                    );
                    feature.apply(record);
                }
            }
        }

        record.mark_composed();
        debug!(
            "Composed {}: {} input(s), {} output(s)",
            record.type_name,
            record.inputs.len(),
            record.outputs.len()
        );
        Ok(())
    }

    /// Compose a copy of the record `class` declares itself
    ///
    /// Returns `Ok(None)` for classes without a record of their own.
    ///
    /// # Errors
    ///
    /// Returns an error if composition fails; see [`Self::compose`].
    pub fn compose_class(&self, class: &ClassDescriptor) -> Result<Option<DefinitionRecord>> {
        let Some(declared) = class.definition() else {
            return Ok(None);
        };
        let mut record = declared.clone();
        self.compose(&mut record, class)?;
        Ok(Some(record))
    }

    /// A directive may never derive from a component, at any distance
    fn check_structure(
        record: &DefinitionRecord,
        ancestors: &[(&ClassDescriptor, &DefinitionRecord)],
    ) -> Result<()> {
        if record.kind != DefinitionKind::Directive {
            return Ok(());
        }
        match ancestors
            .iter()
            .find(|(_, ancestor)| ancestor.kind == DefinitionKind::Component)
        {
            Some((component, _)) => Err(DefinitionError::directive_extends_component(
                record.type_name.clone(),
                component.name(),
            )),
            None => Ok(()),
        }
    }
}
