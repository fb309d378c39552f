//! Serializable snapshots of definition records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{CallbackSlot, DefinitionKind, DefinitionRecord, LifecycleHook};

/// Data-only view of a [`DefinitionRecord`], suitable for logging and diffing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSummary {
    pub kind: DefinitionKind,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<String>,
    pub inputs: IndexMap<String, String>,
    pub declared_inputs: IndexMap<String, String>,
    pub outputs: IndexMap<String, String>,
    /// Lifecycle hook slots that hold a function
    pub hooks: Vec<LifecycleHook>,
    /// Declaring classes of each composed callback slot, in invocation order
    pub callbacks: IndexMap<CallbackSlot, Vec<String>>,
    pub host_vars: u32,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub host_attrs: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export_as: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    pub composed: bool,
}

impl From<&DefinitionRecord> for DefinitionSummary {
    fn from(record: &DefinitionRecord) -> Self {
        let callbacks = CallbackSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                record.callbacks(slot).map(|chain| {
                    let origins = chain.origins().into_iter().map(str::to_owned).collect();
                    (slot, origins)
                })
            })
            .collect();

        Self {
            kind: record.kind,
            type_name: record.type_name.clone(),
            selectors: record.selectors.clone(),
            inputs: record.inputs.clone(),
            declared_inputs: record.declared_inputs.clone(),
            outputs: record.outputs.clone(),
            hooks: record.hooks.present(),
            callbacks,
            host_vars: record.host_vars,
            host_attrs: record.host_attrs.clone(),
            export_as: record.export_as.clone(),
            features: record.features.iter().map(|f| f.name.clone()).collect(),
            composed: record.is_composed(),
        }
    }
}

impl DefinitionSummary {
    /// Render the summary as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
