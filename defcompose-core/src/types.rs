//! Definition record types
//!
//! A [`DefinitionRecord`] is the metadata object a rendering runtime consumes for
//! one directive, component or base class. The template compiler fills in the
//! fields a class declares itself; inheritance composition fills in the rest.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::summary::DefinitionSummary;

/// Kind of definition a class declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// Contributes bindable properties only; never rendered on its own
    Base,
    /// Attribute-style directive
    Directive,
    /// Directive with its own template
    Component,
}

impl DefinitionKind {
    /// Whether records of this kind carry lifecycle, query and host-binding data
    #[must_use]
    pub fn is_renderable(self) -> bool {
        !matches!(self, Self::Base)
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::Directive => "directive",
            Self::Component => "component",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Phase in which the runtime invokes a query or host-binding callback
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RenderFlags: u8 {
        /// Creation pass
        const CREATE = 0b01;
        /// Update pass
        const UPDATE = 0b10;
    }
}

/// Query or host-binding callback: `(phase, context, index)`
pub type DefinitionCallback = Arc<dyn Fn(RenderFlags, &mut dyn Any, Option<usize>) + Send + Sync>;

/// One callback in a [`CallbackChain`], tagged with the class that declared it
#[derive(Clone)]
pub struct CallbackEntry {
    /// Class that declared the callback
    pub origin: String,
    /// The callback itself
    pub callback: DefinitionCallback,
}

impl fmt::Debug for CallbackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackEntry")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Ordered list of callbacks invoked one after another with the same arguments
#[derive(Debug, Clone, Default)]
pub struct CallbackChain {
    entries: Vec<CallbackEntry>,
}

impl CallbackChain {
    /// Create a chain holding a single callback declared by `origin`
    pub fn new<F>(origin: impl Into<String>, callback: F) -> Self
    where
        F: Fn(RenderFlags, &mut dyn Any, Option<usize>) + Send + Sync + 'static,
    {
        Self {
            entries: vec![CallbackEntry {
                origin: origin.into(),
                callback: Arc::new(callback),
            }],
        }
    }

    /// Callbacks in invocation order
    #[must_use]
    pub fn entries(&self) -> &[CallbackEntry] {
        &self.entries
    }

    /// Declaring classes in invocation order
    #[must_use]
    pub fn origins(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.origin.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `earlier` ahead of every entry already in the chain
    pub fn prepend(&mut self, earlier: &CallbackChain) {
        let mut entries = earlier.entries.clone();
        entries.append(&mut self.entries);
        self.entries = entries;
    }

    /// Invoke every callback in order; return values are discarded
    pub fn invoke(&self, flags: RenderFlags, context: &mut dyn Any, index: Option<usize>) {
        for entry in &self.entries {
            (entry.callback)(flags, &mut *context, index);
        }
    }
}

/// Lifecycle hook function bound to a class
#[derive(Clone)]
pub struct HookFn(Arc<dyn Fn(&mut dyn Any) + Send + Sync>);

impl HookFn {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&mut dyn Any) + Send + Sync + 'static,
    {
        Self(Arc::new(hook))
    }

    /// Run the hook against a directive instance
    pub fn call(&self, instance: &mut dyn Any) {
        (self.0)(instance);
    }

    /// Whether both handles point to the same function
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HookFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HookFn(..)")
    }
}

/// Lifecycle hook slot names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleHook {
    OnInit,
    DoCheck,
    AfterContentInit,
    AfterContentChecked,
    AfterViewInit,
    AfterViewChecked,
    OnDestroy,
}

impl LifecycleHook {
    /// Every hook slot, in the order the runtime fires them
    pub const ALL: [Self; 7] = [
        Self::OnInit,
        Self::DoCheck,
        Self::AfterContentInit,
        Self::AfterContentChecked,
        Self::AfterViewInit,
        Self::AfterViewChecked,
        Self::OnDestroy,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnInit => "onInit",
            Self::DoCheck => "doCheck",
            Self::AfterContentInit => "afterContentInit",
            Self::AfterContentChecked => "afterContentChecked",
            Self::AfterViewInit => "afterViewInit",
            Self::AfterViewChecked => "afterViewChecked",
            Self::OnDestroy => "onDestroy",
        }
    }
}

/// The lifecycle hook slots of a record, each filled independently
#[derive(Debug, Clone, Default)]
pub struct LifecycleHooks {
    pub on_init: Option<HookFn>,
    pub do_check: Option<HookFn>,
    pub after_content_init: Option<HookFn>,
    pub after_content_checked: Option<HookFn>,
    pub after_view_init: Option<HookFn>,
    pub after_view_checked: Option<HookFn>,
    pub on_destroy: Option<HookFn>,
}

impl LifecycleHooks {
    #[must_use]
    pub fn get(&self, hook: LifecycleHook) -> Option<&HookFn> {
        match hook {
            LifecycleHook::OnInit => self.on_init.as_ref(),
            LifecycleHook::DoCheck => self.do_check.as_ref(),
            LifecycleHook::AfterContentInit => self.after_content_init.as_ref(),
            LifecycleHook::AfterContentChecked => self.after_content_checked.as_ref(),
            LifecycleHook::AfterViewInit => self.after_view_init.as_ref(),
            LifecycleHook::AfterViewChecked => self.after_view_checked.as_ref(),
            LifecycleHook::OnDestroy => self.on_destroy.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, hook: LifecycleHook) -> &mut Option<HookFn> {
        match hook {
            LifecycleHook::OnInit => &mut self.on_init,
            LifecycleHook::DoCheck => &mut self.do_check,
            LifecycleHook::AfterContentInit => &mut self.after_content_init,
            LifecycleHook::AfterContentChecked => &mut self.after_content_checked,
            LifecycleHook::AfterViewInit => &mut self.after_view_init,
            LifecycleHook::AfterViewChecked => &mut self.after_view_checked,
            LifecycleHook::OnDestroy => &mut self.on_destroy,
        }
    }

    /// Slots that hold a function
    #[must_use]
    pub fn present(&self) -> Vec<LifecycleHook> {
        LifecycleHook::ALL
            .into_iter()
            .filter(|hook| self.get(*hook).is_some())
            .collect()
    }
}

/// Callback slots that are composed across the chain rather than overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallbackSlot {
    ContentQueries,
    ViewQuery,
    HostBindings,
}

impl CallbackSlot {
    pub const ALL: [Self; 3] = [Self::ContentQueries, Self::ViewQuery, Self::HostBindings];
}

/// An input property as written in a class declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDeclaration {
    /// Property name on the class
    pub property: String,
    /// Name template authors bind to
    pub public_name: String,
    /// Alias as originally declared, when it differs from the property name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_name: Option<String>,
}

impl InputDeclaration {
    /// Input exposed under its own property name
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            public_name: property.clone(),
            property,
            declared_name: None,
        }
    }

    /// Input exposed under a different public name
    #[must_use]
    pub fn aliased(property: impl Into<String>, public_name: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            public_name: public_name.into(),
            declared_name: None,
        }
    }

    /// Set the originally declared alias
    #[must_use]
    pub fn declared_as(mut self, declared_name: impl Into<String>) -> Self {
        self.declared_name = Some(declared_name.into());
        self
    }
}

/// An output property as written in a class declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDeclaration {
    /// Property name on the class
    pub property: String,
    /// Emitted event name
    pub public_name: String,
}

impl OutputDeclaration {
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            public_name: property.clone(),
            property,
        }
    }

    #[must_use]
    pub fn aliased(property: impl Into<String>, public_name: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            public_name: public_name.into(),
        }
    }
}

/// Post-processing step attached to a definition
///
/// Features with `inherit` set are also applied to every descendant's record
/// when that record is composed.
#[derive(Clone)]
pub struct DefinitionFeature {
    pub name: String,
    pub inherit: bool,
    apply: Arc<dyn Fn(&mut DefinitionRecord) + Send + Sync>,
}

impl DefinitionFeature {
    pub fn new<F>(name: impl Into<String>, inherit: bool, apply: F) -> Self
    where
        F: Fn(&mut DefinitionRecord) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inherit,
            apply: Arc::new(apply),
        }
    }

    pub fn apply(&self, record: &mut DefinitionRecord) {
        (self.apply)(record);
    }
}

impl fmt::Debug for DefinitionFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionFeature")
            .field("name", &self.name)
            .field("inherit", &self.inherit)
            .finish_non_exhaustive()
    }
}

/// Metadata describing one directive, component or base class
///
/// The binding maps are keyed by public-facing name:
/// `inputs[public] = property`, `declared_inputs[public] = declared alias`,
/// `outputs[public] = property`.
#[derive(Debug, Clone)]
pub struct DefinitionRecord {
    pub kind: DefinitionKind,
    /// Name of the class the record belongs to
    pub type_name: String,
    /// Structural matcher data; opaque to composition
    pub selectors: Vec<String>,
    pub inputs: IndexMap<String, String>,
    pub declared_inputs: IndexMap<String, String>,
    pub outputs: IndexMap<String, String>,
    pub hooks: LifecycleHooks,
    pub content_queries: Option<CallbackChain>,
    pub view_query: Option<CallbackChain>,
    pub host_bindings: Option<CallbackChain>,
    /// Number of binding slots the host bindings allocate
    pub host_vars: u32,
    /// Static attributes set on the host element
    pub host_attrs: IndexMap<String, String>,
    /// Names under which templates may reference the instance
    pub export_as: Vec<String>,
    pub features: Vec<DefinitionFeature>,
    /// Never touched by composition
    pub providers: Option<Vec<serde_json::Value>>,
    composed: bool,
}

impl DefinitionRecord {
    /// Create an empty record of the given kind
    #[must_use]
    pub fn new(kind: DefinitionKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            selectors: Vec::new(),
            inputs: IndexMap::new(),
            declared_inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            hooks: LifecycleHooks::default(),
            content_queries: None,
            view_query: None,
            host_bindings: None,
            host_vars: 0,
            host_attrs: IndexMap::new(),
            export_as: Vec::new(),
            features: Vec::new(),
            providers: None,
            composed: false,
        }
    }

    #[must_use]
    pub fn base(type_name: impl Into<String>) -> Self {
        Self::new(DefinitionKind::Base, type_name)
    }

    #[must_use]
    pub fn directive(type_name: impl Into<String>) -> Self {
        Self::new(DefinitionKind::Directive, type_name)
    }

    #[must_use]
    pub fn component(type_name: impl Into<String>) -> Self {
        Self::new(DefinitionKind::Component, type_name)
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Add an input, filling both `inputs` and `declared_inputs`
    #[must_use]
    pub fn with_input(mut self, input: InputDeclaration) -> Self {
        let declared = input
            .declared_name
            .unwrap_or_else(|| input.property.clone());
        self.inputs.insert(input.public_name.clone(), input.property);
        self.declared_inputs.insert(input.public_name, declared);
        self
    }

    #[must_use]
    pub fn with_inputs(self, inputs: impl IntoIterator<Item = InputDeclaration>) -> Self {
        inputs.into_iter().fold(self, Self::with_input)
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputDeclaration) -> Self {
        self.outputs.insert(output.public_name, output.property);
        self
    }

    #[must_use]
    pub fn with_outputs(self, outputs: impl IntoIterator<Item = OutputDeclaration>) -> Self {
        outputs.into_iter().fold(self, Self::with_output)
    }

    /// Set a lifecycle hook slot, as the class's own method for that hook
    #[must_use]
    pub fn with_hook(mut self, hook: LifecycleHook, function: HookFn) -> Self {
        *self.hooks.slot_mut(hook) = Some(function);
        self
    }

    #[must_use]
    pub fn with_content_queries<F>(mut self, callback: F) -> Self
    where
        F: Fn(RenderFlags, &mut dyn Any, Option<usize>) + Send + Sync + 'static,
    {
        self.content_queries = Some(CallbackChain::new(self.type_name.clone(), callback));
        self
    }

    #[must_use]
    pub fn with_view_query<F>(mut self, callback: F) -> Self
    where
        F: Fn(RenderFlags, &mut dyn Any, Option<usize>) + Send + Sync + 'static,
    {
        self.view_query = Some(CallbackChain::new(self.type_name.clone(), callback));
        self
    }

    /// Set the host-binding callback and the number of slots it allocates
    #[must_use]
    pub fn with_host_bindings<F>(mut self, host_vars: u32, callback: F) -> Self
    where
        F: Fn(RenderFlags, &mut dyn Any, Option<usize>) + Send + Sync + 'static,
    {
        self.host_bindings = Some(CallbackChain::new(self.type_name.clone(), callback));
        self.host_vars = host_vars;
        self
    }

    #[must_use]
    pub fn with_host_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.host_attrs.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_export_as(mut self, name: impl Into<String>) -> Self {
        self.export_as.push(name.into());
        self
    }

    #[must_use]
    pub fn with_feature(mut self, feature: DefinitionFeature) -> Self {
        self.features.push(feature);
        self
    }

    #[must_use]
    pub fn with_providers(mut self, providers: Vec<serde_json::Value>) -> Self {
        self.providers = Some(providers);
        self
    }

    #[must_use]
    pub fn callbacks(&self, slot: CallbackSlot) -> Option<&CallbackChain> {
        match slot {
            CallbackSlot::ContentQueries => self.content_queries.as_ref(),
            CallbackSlot::ViewQuery => self.view_query.as_ref(),
            CallbackSlot::HostBindings => self.host_bindings.as_ref(),
        }
    }

    pub fn callbacks_mut(&mut self, slot: CallbackSlot) -> &mut Option<CallbackChain> {
        match slot {
            CallbackSlot::ContentQueries => &mut self.content_queries,
            CallbackSlot::ViewQuery => &mut self.view_query,
            CallbackSlot::HostBindings => &mut self.host_bindings,
        }
    }

    /// Whether inheritance has already been folded into this record
    #[must_use]
    pub fn is_composed(&self) -> bool {
        self.composed
    }

    /// Record that composition has finished
    ///
    /// Reserved for `DefinitionComposer`. A record flagged here without being
    /// composed is skipped by later composition requests and ends the field
    /// merge of any class deriving from it.
    #[doc(hidden)]
    pub fn mark_composed(&mut self) {
        self.composed = true;
    }

    /// Serializable snapshot of the record
    #[must_use]
    pub fn summary(&self) -> DefinitionSummary {
        DefinitionSummary::from(self)
    }
}
