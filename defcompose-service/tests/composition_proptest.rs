// Property-based tests for definition composition
//
// Chains of random depth are generated with random binding maps and random
// hook/callback presence per level, and the composed leaf is checked against
// the precedence and ordering rules directly.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use defcompose_core::{
    ClassDescriptor, DefinitionKind, DefinitionRecord, HookFn, InputDeclaration, LifecycleHook,
    OutputDeclaration, RenderFlags,
};
use defcompose_service::DefinitionComposer;
use proptest::prelude::*;

/// One level of a generated chain, listed leaf first
#[derive(Debug, Clone)]
struct Level {
    has_record: bool,
    inputs: BTreeMap<String, String>,
    outputs: BTreeMap<String, String>,
    has_on_init: bool,
    has_view_query: bool,
    providers: Vec<u8>,
}

// Strategy: small public-name alphabet so levels collide often
fn public_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(str::to_string)
}

fn binding_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(public_name(), "[a-z]{1,6}", 0..4)
}

fn level() -> impl Strategy<Value = Level> {
    (
        any::<bool>(),
        binding_map(),
        binding_map(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(any::<u8>(), 0..3),
    )
        .prop_map(
            |(has_record, inputs, outputs, has_on_init, has_view_query, providers)| Level {
                has_record,
                inputs,
                outputs,
                has_on_init,
                has_view_query,
                providers,
            },
        )
}

struct BuiltChain {
    leaf_class: Arc<ClassDescriptor>,
    leaf_record: DefinitionRecord,
    /// Hook function per level, leaf first, for levels whose record sets it
    hooks: Vec<Option<HookFn>>,
    log: Arc<Mutex<Vec<usize>>>,
}

fn record_for(
    index: usize,
    level: &Level,
    log: &Arc<Mutex<Vec<usize>>>,
) -> (DefinitionRecord, Option<HookFn>) {
    let name = format!("Level{index}");
    let mut record = DefinitionRecord::new(DefinitionKind::Directive, name)
        .with_inputs(
            level
                .inputs
                .iter()
                .map(|(public, property)| InputDeclaration::aliased(property.clone(), public.clone())),
        )
        .with_outputs(
            level
                .outputs
                .iter()
                .map(|(public, property)| OutputDeclaration::aliased(property.clone(), public.clone())),
        )
        .with_providers(
            level
                .providers
                .iter()
                .map(|p| serde_json::json!(p))
                .collect(),
        );

    let hook = level.has_on_init.then(|| HookFn::new(|_| {}));
    if let Some(hook) = &hook {
        record = record.with_hook(LifecycleHook::OnInit, hook.clone());
    }
    if level.has_view_query {
        let log = Arc::clone(log);
        record = record.with_view_query(move |_, _, _| log.lock().unwrap().push(index));
    }
    (record, hook)
}

/// Build the chain root first; `levels[0]` is the leaf and always has a record
fn build(levels: &[Level]) -> BuiltChain {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut hooks = vec![None; levels.len()];
    let mut parent: Option<Arc<ClassDescriptor>> = None;
    let mut leaf_record = None;

    for (index, level) in levels.iter().enumerate().rev() {
        let name = format!("Level{index}");
        let record = if index == 0 || level.has_record {
            let (record, hook) = record_for(index, level, &log);
            hooks[index] = hook;
            Some(record)
        } else {
            None
        };

        let class_record = if index == 0 {
            leaf_record = record;
            None
        } else {
            record
        };
        parent = Some(match parent {
            None => ClassDescriptor::root(name, class_record),
            Some(p) => ClassDescriptor::derived(name, &p, class_record),
        });
    }

    BuiltChain {
        leaf_class: parent.expect("at least one level"),
        leaf_record: leaf_record.expect("leaf always has a record"),
        hooks,
        log,
    }
}

/// First defining level (leaf first) wins
fn expected_map(
    levels: &[Level],
    pick: impl Fn(&Level) -> &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut expected = BTreeMap::new();
    for (index, level) in levels.iter().enumerate() {
        if index > 0 && !level.has_record {
            continue;
        }
        for (public, property) in pick(level) {
            expected.entry(public.clone()).or_insert_with(|| property.clone());
        }
    }
    expected
}

fn contributes(index: usize, level: &Level) -> bool {
    index == 0 || level.has_record
}

proptest! {
    #[test]
    fn test_binding_maps_follow_precedence(levels in prop::collection::vec(level(), 1..6)) {
        let mut chain = build(&levels);
        DefinitionComposer::default()
            .compose(&mut chain.leaf_record, &chain.leaf_class)
            .unwrap();

        let inputs: BTreeMap<String, String> = chain.leaf_record.inputs.clone().into_iter().collect();
        let outputs: BTreeMap<String, String> = chain.leaf_record.outputs.clone().into_iter().collect();
        prop_assert_eq!(inputs, expected_map(&levels, |l| &l.inputs));
        prop_assert_eq!(outputs, expected_map(&levels, |l| &l.outputs));
    }

    #[test]
    fn test_hook_slot_is_nearest_present(levels in prop::collection::vec(level(), 1..6)) {
        let mut chain = build(&levels);
        DefinitionComposer::default()
            .compose(&mut chain.leaf_record, &chain.leaf_class)
            .unwrap();

        let expected = chain.hooks.iter().flatten().next();
        match (chain.leaf_record.hooks.on_init.as_ref(), expected) {
            (Some(actual), Some(expected)) => prop_assert!(actual.ptr_eq(expected)),
            (None, None) => {}
            (actual, expected) => prop_assert!(
                false,
                "hook presence mismatch: actual {:?}, expected {:?}",
                actual.is_some(),
                expected.is_some()
            ),
        }
    }

    #[test]
    fn test_view_queries_run_farthest_first_every_time(
        levels in prop::collection::vec(level(), 1..6),
        invocations in 1_usize..4,
    ) {
        let mut chain = build(&levels);
        DefinitionComposer::default()
            .compose(&mut chain.leaf_record, &chain.leaf_class)
            .unwrap();

        let expected_once: Vec<usize> = levels
            .iter()
            .enumerate()
            .filter(|(index, level)| contributes(*index, level) && level.has_view_query)
            .map(|(index, _)| index)
            .rev()
            .collect();

        let mut ctx = ();
        for _ in 0..invocations {
            if let Some(view_query) = &chain.leaf_record.view_query {
                view_query.invoke(RenderFlags::CREATE | RenderFlags::UPDATE, &mut ctx, None);
            }
        }

        let expected: Vec<usize> = std::iter::repeat_n(expected_once.clone(), invocations)
            .flatten()
            .collect();
        prop_assert_eq!(chain.leaf_record.view_query.is_some(), !expected_once.is_empty());
        prop_assert_eq!(chain.log.lock().unwrap().clone(), expected);
    }

    #[test]
    fn test_providers_unchanged(levels in prop::collection::vec(level(), 1..6)) {
        let mut chain = build(&levels);
        let before = chain.leaf_record.providers.clone();
        DefinitionComposer::default()
            .compose(&mut chain.leaf_record, &chain.leaf_class)
            .unwrap();
        prop_assert_eq!(chain.leaf_record.providers.clone(), before);
    }

    #[test]
    fn test_component_anywhere_above_directive_fails(
        levels in prop::collection::vec(level(), 2..6),
        component_at in 1_usize..6,
    ) {
        let component_at = component_at.min(levels.len() - 1);
        let mut parent: Option<Arc<ClassDescriptor>> = None;
        for index in (1..levels.len()).rev() {
            let name = format!("Level{index}");
            let record = if index == component_at {
                Some(DefinitionRecord::component(name.clone()))
            } else if levels[index].has_record {
                Some(DefinitionRecord::directive(name.clone()))
            } else {
                None
            };
            parent = Some(match parent {
                None => ClassDescriptor::root(name, record),
                Some(p) => ClassDescriptor::derived(name, &p, record),
            });
        }
        let leaf = ClassDescriptor::derived("Leaf", &parent.unwrap(), None);
        let mut record = DefinitionRecord::directive("Leaf").with_input(InputDeclaration::new("own"));

        let result = DefinitionComposer::default().compose(&mut record, &leaf);

        prop_assert!(result.is_err());
        prop_assert!(!record.is_composed());
        prop_assert_eq!(record.inputs.len(), 1);
    }
}
