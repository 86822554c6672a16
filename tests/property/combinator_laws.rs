// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Combinator Evaluation
//!
//! Each case builds two random leaf arrays and evaluates a tree on a fresh,
//! paused Tokio runtime. Input1 events sit on even tenths of a second and
//! input2 events on any tenth, so ties occur both inside one input (array
//! order decides) and across the inputs (input1 decides).

use cim_stream_combinators::{
    CombinatorTree, Engine, EngineConfig, Event, EventId, EvaluationContext, Value,
};
use proptest::prelude::*;
use std::future::Future;

// ============================================================================
// Harness
// ============================================================================

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .expect("runtime builds")
        .block_on(future)
}

fn evaluate(tree: &CombinatorTree, ctx: &EvaluationContext) -> Vec<Event> {
    let engine = Engine::new(EngineConfig::default()).expect("default config is valid");
    block_on(engine.run(tree, ctx))
}

fn context(first: Vec<Event>, second: Vec<Event>) -> EvaluationContext {
    EvaluationContext::new(first, second, 10.0).expect("generated inputs are valid")
}

fn ids(events: &[Event]) -> Vec<EventId> {
    events.iter().map(|e| e.id().clone()).collect()
}

fn values(events: &[Event]) -> Vec<Value> {
    events.iter().map(|e| e.value().clone()).collect()
}

/// Both inputs in arrival order, tagged with their side; ties keep input1
/// first
fn arrivals(ctx: &EvaluationContext) -> Vec<(bool, Event)> {
    let mut all: Vec<(bool, Event)> = ctx
        .first_input_events()
        .iter()
        .map(|e| (true, e.clone()))
        .chain(ctx.second_input_events().iter().map(|e| (false, e.clone())))
        .collect();
    all.sort_by(|a, b| a.1.cmp_time(&b.1));
    all
}

// ============================================================================
// Strategies
// ============================================================================

/// Input1: integer payloads at even tenths
fn first_input() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0u32..40, any::<i8>()), 0..8).prop_map(|slots| {
        slots
            .into_iter()
            .map(|(slot, v)| Event::new(f64::from(slot * 2) / 10.0, Value::Int(i64::from(v))))
            .collect()
    })
}

/// Input2: string payloads at any tenth, often tied with input1
fn second_input() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0u32..80, "[a-z]{1,3}"), 0..8).prop_map(|slots| {
        slots
            .into_iter()
            .map(|(slot, v)| Event::new(f64::from(slot) / 10.0, Value::from(v)))
            .collect()
    })
}

fn non_empty_first_input() -> impl Strategy<Value = Vec<Event>> {
    first_input().prop_filter("non-empty", |events| !events.is_empty())
}

fn non_empty_second_input() -> impl Strategy<Value = Vec<Event>> {
    second_input().prop_filter("non-empty", |events| !events.is_empty())
}

/// Arbitrary trees over both inputs
fn combinator_tree() -> impl Strategy<Value = CombinatorTree> {
    let leaf = prop_oneof![Just(CombinatorTree::first()), Just(CombinatorTree::second())];
    leaf.prop_recursive(4, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.merge(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.chain(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.zip(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.combine_latest(r)),
            inner.prop_map(CombinatorTree::adjacent_pairs),
        ]
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: merge emits every input event exactly once, in time order
    #[test]
    fn prop_merge_interleaves_all_events(
        first in non_empty_first_input(),
        second in non_empty_second_input(),
    ) {
        let ctx = context(first, second);
        let tree = CombinatorTree::first().merge(CombinatorTree::second());

        let events = evaluate(&tree, &ctx);

        let expected: Vec<Event> = arrivals(&ctx).into_iter().map(|(_, e)| e).collect();
        prop_assert_eq!(events.len(), ctx.first_input_events().len() + ctx.second_input_events().len());
        prop_assert_eq!(ids(&events), ids(&expected));
        prop_assert_eq!(values(&events), values(&expected));
    }

    /// Property: chain emits all of input1 before any of input2
    #[test]
    fn prop_chain_preserves_operand_order(first in first_input(), second in second_input()) {
        let ctx = context(first, second);
        let tree = CombinatorTree::first().chain(CombinatorTree::second());

        let events = evaluate(&tree, &ctx);

        let expected: Vec<EventId> = ctx
            .first_input_events()
            .iter()
            .chain(ctx.second_input_events())
            .map(|e| e.id().clone())
            .collect();
        prop_assert_eq!(ids(&events), expected);
    }

    /// Property: zip pairs the k-th events of both inputs, min(|A|, |B|) times
    #[test]
    fn prop_zip_pairs_positionally(first in first_input(), second in second_input()) {
        let ctx = context(first, second);
        let tree = CombinatorTree::first().zip(CombinatorTree::second());

        let events = evaluate(&tree, &ctx);

        let expected: Vec<EventId> = ctx
            .first_input_events()
            .iter()
            .zip(ctx.second_input_events())
            .map(|(a, b)| EventId::combined(a.id().clone(), b.id().clone()))
            .collect();
        prop_assert_eq!(
            events.len(),
            ctx.first_input_events().len().min(ctx.second_input_events().len())
        );
        prop_assert_eq!(ids(&events), expected);
    }

    /// Property: combineLatest fires once per arrival after both sides emitted
    #[test]
    fn prop_combine_latest_fires_after_both_sides(first in first_input(), second in second_input()) {
        let ctx = context(first, second);
        let tree = CombinatorTree::first().combine_latest(CombinatorTree::second());

        let events = evaluate(&tree, &ctx);

        let mut latest_first: Option<Event> = None;
        let mut latest_second: Option<Event> = None;
        let mut expected = Vec::new();
        for (is_first, event) in arrivals(&ctx) {
            if is_first {
                latest_first = Some(event);
            } else {
                latest_second = Some(event);
            }
            if let (Some(a), Some(b)) = (&latest_first, &latest_second) {
                expected.push(Value::combined(a.value().clone(), b.value().clone()));
            }
        }
        prop_assert_eq!(values(&events), expected);
    }

    /// Property: adjacentPairs emits max(|A| - 1, 0) consecutive pairs
    #[test]
    fn prop_adjacent_pairs_count(first in first_input()) {
        let ctx = context(first, vec![]);
        let tree = CombinatorTree::first().adjacent_pairs();

        let events = evaluate(&tree, &ctx);

        let inputs = ctx.first_input_events();
        let expected: Vec<EventId> = inputs
            .windows(2)
            .map(|w| EventId::combined(w[0].id().clone(), w[1].id().clone()))
            .collect();
        prop_assert_eq!(events.len(), inputs.len().saturating_sub(1));
        prop_assert_eq!(ids(&events), expected);
    }

    /// Property: evaluation is deterministic
    ///
    /// The same tree over the same context yields the same identities and
    /// values in the same order.
    #[test]
    fn prop_evaluation_is_deterministic(
        tree in combinator_tree(),
        first in first_input(),
        second in second_input(),
    ) {
        let ctx = context(first, second);

        let run1 = evaluate(&tree, &ctx);
        let run2 = evaluate(&tree, &ctx);

        prop_assert_eq!(ids(&run1), ids(&run2));
        prop_assert_eq!(values(&run1), values(&run2));
    }

    /// Property: reported times never decrease along a trace
    #[test]
    fn prop_reported_times_are_monotonic(
        tree in combinator_tree(),
        first in first_input(),
        second in second_input(),
    ) {
        let ctx = context(first, second);

        let events = evaluate(&tree, &ctx);

        prop_assert!(events.windows(2).all(|w| w[0].time() <= w[1].time()));
    }
}
