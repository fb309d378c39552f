//! Field merge policies
//!
//! Each mergeable field category of a [`DefinitionRecord`] has one policy that
//! folds an ancestor's value into the leaf's accumulated value. Ancestors are
//! folded one at a time, nearest first, so every policy only ever sees the leaf
//! (plus nearer ancestors) on the left and a farther ancestor on the right.

use indexmap::IndexMap;

use defcompose_core::{
    CallbackChain, CallbackSlot, DefinitionRecord, HookFn, LifecycleHook, LifecycleHooks,
};

/// Strategy for combining one field category
pub trait MergePolicy<T: ?Sized> {
    /// Fold `ancestor` into `accumulated`; `ancestor` is never modified
    fn merge(accumulated: &mut T, ancestor: &T);
}

/// Key-wise union where existing keys are never overwritten
///
/// Used for the binding maps and host attributes. The leaf's own entries are
/// already present when the first ancestor is folded, and nearer ancestors are
/// folded before farther ones, which gives leaf > nearer > farther precedence.
#[derive(Debug, Clone, Copy)]
pub struct FillAbsentKeys;

impl MergePolicy<IndexMap<String, String>> for FillAbsentKeys {
    fn merge(accumulated: &mut IndexMap<String, String>, ancestor: &IndexMap<String, String>) {
        for (public_name, value) in ancestor {
            if !accumulated.contains_key(public_name) {
                accumulated.insert(public_name.clone(), value.clone());
            }
        }
    }
}

/// Keep a present value, otherwise adopt the ancestor's
#[derive(Debug, Clone, Copy)]
pub struct FirstPresent;

impl MergePolicy<Option<HookFn>> for FirstPresent {
    fn merge(accumulated: &mut Option<HookFn>, ancestor: &Option<HookFn>) {
        if accumulated.is_none() {
            accumulated.clone_from(ancestor);
        }
    }
}

impl MergePolicy<LifecycleHooks> for FirstPresent {
    fn merge(accumulated: &mut LifecycleHooks, ancestor: &LifecycleHooks) {
        for hook in LifecycleHook::ALL {
            let inherited = ancestor.get(hook).cloned();
            <Self as MergePolicy<Option<HookFn>>>::merge(accumulated.slot_mut(hook), &inherited);
        }
    }
}

/// Run the ancestor's callbacks ahead of everything accumulated so far
///
/// Folding nearest to farthest therefore yields farthest-first invocation,
/// ending with the leaf's own callback.
#[derive(Debug, Clone, Copy)]
pub struct ComposeCallbacks;

impl MergePolicy<Option<CallbackChain>> for ComposeCallbacks {
    fn merge(accumulated: &mut Option<CallbackChain>, ancestor: &Option<CallbackChain>) {
        let Some(inherited) = ancestor else {
            return;
        };
        match accumulated {
            Some(chain) => chain.prepend(inherited),
            None => *accumulated = Some(inherited.clone()),
        }
    }
}

/// Add the ancestor's count to the accumulated count
#[derive(Debug, Clone, Copy)]
pub struct SumCounts;

impl MergePolicy<u32> for SumCounts {
    fn merge(accumulated: &mut u32, ancestor: &u32) {
        *accumulated = accumulated.saturating_add(*ancestor);
    }
}

/// Append names not yet present, keeping existing order
#[derive(Debug, Clone, Copy)]
pub struct AppendDistinct;

impl MergePolicy<Vec<String>> for AppendDistinct {
    fn merge(accumulated: &mut Vec<String>, ancestor: &Vec<String>) {
        for name in ancestor {
            if !accumulated.contains(name) {
                accumulated.push(name.clone());
            }
        }
    }
}

/// Fold one ancestor record into the leaf's accumulated record
///
/// Base-kind records on either side only take part in the binding maps and
/// host attributes. `providers` is never read or written here.
pub fn fold_ancestor(leaf: &mut DefinitionRecord, ancestor: &DefinitionRecord) {
    FillAbsentKeys::merge(&mut leaf.inputs, &ancestor.inputs);
    FillAbsentKeys::merge(&mut leaf.declared_inputs, &ancestor.declared_inputs);
    FillAbsentKeys::merge(&mut leaf.outputs, &ancestor.outputs);
    FillAbsentKeys::merge(&mut leaf.host_attrs, &ancestor.host_attrs);

    if !(leaf.kind.is_renderable() && ancestor.kind.is_renderable()) {
        return;
    }

    FirstPresent::merge(&mut leaf.hooks, &ancestor.hooks);

    for slot in CallbackSlot::ALL {
        let inherited = ancestor.callbacks(slot).cloned();
        ComposeCallbacks::merge(leaf.callbacks_mut(slot), &inherited);
    }

    if ancestor.host_bindings.is_some() {
        SumCounts::merge(&mut leaf.host_vars, &ancestor.host_vars);
    }
    AppendDistinct::merge(&mut leaf.export_as, &ancestor.export_as);
}
