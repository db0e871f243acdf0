//! Property-based tests for the reconciler
//!
//! These tests check the surface invariants across arbitrary event sequences.

use super::*;
use crate::events::{decode, NodeNames, PipelineEvent, ToolCallRequest};
use crate::remote::StreamEvent;
use crate::ui::{PlaceholderKind, ToolKind, UiSurface};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Test Helpers
// ============================================================================

/// Feed a finished event sequence through a fresh reconciler
fn run(events: &[PipelineEvent]) -> UiSurface {
    let mut surface = UiSurface::new();
    let mut reconciler = Reconciler::new();
    let mut binding = SinkBinding::new();
    for event in events {
        binding.apply_all(reconciler.handle(event), &mut surface);
    }
    binding.apply_all(reconciler.finish(), &mut surface);
    surface
}

fn is_tool_call(event: &PipelineEvent) -> bool {
    matches!(
        event,
        PipelineEvent::ModelInvocationEnd {
            tool_call: Some(_),
            ..
        }
    )
}

fn first_tool_type(events: &[PipelineEvent]) -> Option<String> {
    events.iter().find_map(|event| match event {
        PipelineEvent::ModelInvocationEnd {
            tool_call: Some(call),
            ..
        } => Some(call.tool_type.clone()),
        _ => None,
    })
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_tool_type() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(ToolKind::ALL.to_vec()).prop_map(|kind| kind.as_str().to_string()),
        1 => "[a-z]{3,8}-[a-z]{3,8}",
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z ]{0,12}".prop_map(|s| json!({ "value": s })),
    ]
}

fn arb_run_id() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["r1", "r2", "r3"]).prop_map(String::from)
}

fn arb_model_end() -> impl Strategy<Value = PipelineEvent> {
    (
        arb_run_id(),
        prop::option::weighted(0.8, (arb_tool_type(), arb_json())),
    )
        .prop_map(|(run_id, call)| PipelineEvent::ModelInvocationEnd {
            run_id,
            tool_call: call.map(|(tool_type, args)| ToolCallRequest { tool_type, args }),
        })
}

fn arb_tool_end() -> impl Strategy<Value = PipelineEvent> {
    (arb_run_id(), arb_json())
        .prop_map(|(run_id, tool_result)| PipelineEvent::ToolExecutionEnd { run_id, tool_result })
}

fn arb_chunk() -> impl Strategy<Value = PipelineEvent> {
    (arb_run_id(), "[a-zA-Z !]{0,6}")
        .prop_map(|(run_id, content)| PipelineEvent::ChatModelChunk { run_id, content })
}

fn arb_unrecognized() -> impl Strategy<Value = PipelineEvent> {
    ("on_[a-z]{3,6}_(start|stream|end)", "[A-Za-z]{3,10}")
        .prop_map(|(event, name)| PipelineEvent::Unrecognized { event, name })
}

fn arb_event() -> impl Strategy<Value = PipelineEvent> {
    prop_oneof![
        1 => arb_model_end(),
        1 => arb_tool_end(),
        3 => arb_chunk(),
        1 => arb_unrecognized(),
    ]
}

fn arb_events() -> impl Strategy<Value = Vec<PipelineEvent>> {
    prop::collection::vec(arb_event(), 0..40)
}

fn arb_chat_only_events() -> impl Strategy<Value = Vec<PipelineEvent>> {
    prop::collection::vec(prop_oneof![arb_chunk(), arb_tool_end(), arb_unrecognized()], 0..40)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn no_tool_calls_means_no_tool_placeholder(events in arb_chat_only_events()) {
        let surface = run(&events);
        prop_assert_eq!(surface.tool_placeholders().count(), 0);
        prop_assert!(surface
            .placeholders()
            .iter()
            .all(|p| !matches!(p.kind, PlaceholderKind::Error)));
    }

    #[test]
    fn at_most_one_tool_placeholder(events in arb_events()) {
        let surface = run(&events);
        let tools = surface.tool_placeholders().count();
        let errors = surface
            .placeholders()
            .iter()
            .filter(|p| matches!(p.kind, PlaceholderKind::Error))
            .count();

        match first_tool_type(&events) {
            None => prop_assert_eq!(tools + errors, 0),
            Some(tool_type) => {
                prop_assert_eq!(tools + errors, 1);
                match ToolKind::from_type(&tool_type) {
                    Some(kind) => {
                        let placeholder = surface.tool_placeholders().next();
                        prop_assert_eq!(
                            placeholder.map(|p| p.kind.clone()),
                            Some(PlaceholderKind::Tool { tool: kind })
                        );
                    }
                    None => prop_assert_eq!(errors, 1),
                }
            }
        }
    }

    #[test]
    fn tool_finalizes_with_first_result(events in arb_events()) {
        let surface = run(&events);
        let Some(placeholder) = surface.tool_placeholders().next() else {
            return Ok(());
        };

        let first_call = events.iter().position(is_tool_call);
        let first_result = first_call.and_then(|start| {
            events.iter().skip(start).find_map(|event| match event {
                PipelineEvent::ToolExecutionEnd { tool_result, .. } => Some(tool_result.clone()),
                _ => None,
            })
        });

        match first_result {
            Some(result) => {
                prop_assert!(placeholder.is_done());
                prop_assert_eq!(&placeholder.view.props, &result);
            }
            None => prop_assert!(!placeholder.is_done()),
        }
    }

    #[test]
    fn chunks_concatenate_per_run_id(events in arb_events()) {
        let surface = run(&events);

        let mut expected: Vec<(String, String)> = Vec::new();
        for event in &events {
            if let PipelineEvent::ChatModelChunk { run_id, content } = event {
                match expected.iter_mut().find(|(id, _)| id == run_id) {
                    Some((_, text)) => text.push_str(content),
                    None => expected.push((run_id.clone(), content.clone())),
                }
            }
        }

        let actual: Vec<(String, String)> = surface
            .message_placeholders()
            .map(|p| match &p.kind {
                PlaceholderKind::Message { run_id } => (run_id.clone(), p.text.clone()),
                _ => unreachable!(),
            })
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(surface.message_placeholders().all(|p| p.is_done()));
    }

    #[test]
    fn replay_is_idempotent(events in arb_events()) {
        let first = run(&events);
        let second = run(&events);
        prop_assert_eq!(first.placeholders(), second.placeholders());
    }

    #[test]
    fn placeholder_ids_follow_creation_order(events in arb_events()) {
        let surface = run(&events);
        for (index, placeholder) in surface.placeholders().iter().enumerate() {
            prop_assert_eq!(placeholder.id.0 as usize, index);
        }
    }
}

// ============================================================================
// Scenarios, fed through wire-level decoding
// ============================================================================

fn run_wire(raw: Vec<StreamEvent>) -> UiSurface {
    let nodes = NodeNames::default();
    let events: Vec<_> = raw.into_iter().map(|event| decode(event, &nodes)).collect();
    run(&events)
}

#[test]
fn scenario_streamed_greeting() {
    let surface = run_wire(vec![
        StreamEvent::new("on_chat_model_stream", "ChatOpenAI", "r1").with_chunk(json!({"content": "Hello"})),
        StreamEvent::new("on_chat_model_stream", "ChatOpenAI", "r1").with_chunk(json!({"content": "!"})),
    ]);

    assert_eq!(surface.placeholders().len(), 1);
    let message = &surface.placeholders()[0];
    assert_eq!(message.text, "Hello!");
    assert_eq!(message.view.component, "ai-message");
}

#[test]
fn scenario_weather_tool() {
    let surface = run_wire(vec![
        StreamEvent::new("on_chain_end", "invoke_model", "m1")
            .with_output(json!({"tool_calls": [{"type": "weather-data", "args": {"city": "Rome"}}]})),
        StreamEvent::new("on_chain_end", "invoke_tools", "t1").with_output(json!({"tool_result": {"temp": 72}})),
    ]);

    assert_eq!(surface.placeholders().len(), 1);
    let tool = &surface.placeholders()[0];
    assert!(tool.is_done());
    assert_eq!(tool.view.component, "current-weather");
    assert_eq!(tool.view.props, json!({"temp": 72}));
}

#[test]
fn scenario_second_tool_call_ignored() {
    let surface = run_wire(vec![
        StreamEvent::new("on_chain_end", "invoke_model", "m1")
            .with_output(json!({"tool_calls": [{"type": "weather-data", "args": {}}]})),
        StreamEvent::new("on_chain_end", "invoke_tools", "t1").with_output(json!({"tool_result": {"temp": 72}})),
        StreamEvent::new("on_chain_end", "invoke_model", "m2")
            .with_output(json!({"tool_calls": [{"type": "github-repo", "args": {}}]})),
    ]);

    assert_eq!(surface.tool_placeholders().count(), 1);
    assert_eq!(
        surface.placeholders()[0].kind,
        PlaceholderKind::Tool {
            tool: ToolKind::WeatherData
        }
    );
}

#[test]
fn scenario_result_without_call() {
    let surface = run_wire(vec![
        StreamEvent::new("on_chain_end", "invoke_tools", "t1").with_output(json!({"tool_result": {"temp": 72}})),
    ]);
    assert!(surface.placeholders().is_empty());
}

#[test]
fn unknown_tool_yields_single_error_placeholder() {
    let surface = run_wire(vec![
        StreamEvent::new("on_chain_end", "invoke_model", "m1")
            .with_output(json!({"tool_calls": [{"type": "stock-price", "args": {}}]})),
        StreamEvent::new("on_chat_model_stream", "ChatOpenAI", "r1").with_chunk(json!({"content": "ok"})),
    ]);

    assert_eq!(surface.tool_placeholders().count(), 0);
    assert_eq!(surface.placeholders().len(), 2);
    assert_eq!(surface.placeholders()[0].kind, PlaceholderKind::Error);
    assert_eq!(surface.placeholders()[1].text, "ok");
}

#[test]
fn untyped_first_tool_call_still_claims_the_turn() {
    let surface = run_wire(vec![
        StreamEvent::new("on_chain_end", "invoke_model", "m1").with_output(json!({"tool_calls": [{"args": {}}]})),
        StreamEvent::new("on_chain_end", "invoke_model", "m2")
            .with_output(json!({"tool_calls": [{"type": "weather-data", "args": {"city": "Rome"}}]})),
        StreamEvent::new("on_chain_end", "invoke_tools", "t1").with_output(json!({"tool_result": {"temp": 72}})),
    ]);

    assert_eq!(surface.tool_placeholders().count(), 0);
    assert_eq!(surface.placeholders().len(), 1);
    assert_eq!(surface.placeholders()[0].kind, PlaceholderKind::Error);
    assert_eq!(
        surface.placeholders()[0].view.props,
        json!({"message": "Tool call without a type"})
    );
}

#[test]
fn loading_view_carries_tool_call_args() {
    let args = json!({"city": "Rome", "units": "metric"});
    let surface = run_wire(vec![StreamEvent::new("on_chain_end", "invoke_model", "m1")
        .with_output(json!({"tool_calls": [{"type": "weather-data", "args": args.clone()}]}))]);

    assert_eq!(surface.placeholders().len(), 1);
    let tool = &surface.placeholders()[0];
    assert!(!tool.is_done());
    assert_eq!(
        tool.kind,
        PlaceholderKind::Tool {
            tool: ToolKind::WeatherData
        }
    );
    assert_eq!(tool.view.component, "current-weather-loading");
    assert_eq!(tool.view.props, args);
}
