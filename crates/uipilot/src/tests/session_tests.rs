use std::time::{Duration, Instant};

use crate::errors::AutomationError;
use crate::patterns::{
    PatternId, PatternOp, TransformCapabilities, TransformRequest, WindowVisualState,
};
use crate::query::Property;

use super::mock::{fixture, fixture_with_delay, ProviderCall};

#[test]
fn invoke_dispatches_exactly_one_provider_invoke() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Submit").unwrap();
    f.session.invoke().unwrap();

    let performs: Vec<_> = f
        .provider
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ProviderCall::Perform(_)))
        .collect();
    assert_eq!(performs, vec![ProviderCall::Perform(PatternOp::Invoke)]);
}

#[test]
fn settle_delay_elapses_after_a_mutating_action() {
    let mut f = fixture_with_delay(Duration::from_millis(40));
    f.session.add_property(Property::Name, "Submit").unwrap();
    let started = Instant::now();
    f.session.invoke().unwrap();
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[test]
fn expand_collapse_select_and_realize_map_to_their_ops() {
    let mut f = fixture();
    for (op, action) in [
        (PatternOp::Expand, "expand"),
        (PatternOp::Collapse, "collapse"),
        (PatternOp::Select, "select"),
        (PatternOp::Realize, "realize"),
    ] {
        f.session.add_property(Property::Name, "Submit").unwrap();
        match action {
            "expand" => f.session.expand().unwrap(),
            "collapse" => f.session.collapse().unwrap(),
            "select" => f.session.select_item().unwrap(),
            _ => f.session.realize().unwrap(),
        }
        assert!(f.provider.calls().contains(&ProviderCall::Perform(op)));
    }
}

#[test]
fn write_sets_the_element_value() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Submit").unwrap();
    f.session.write("hello").unwrap();
    assert!(f
        .provider
        .calls()
        .contains(&ProviderCall::Perform(PatternOp::SetValue(
            "hello".to_string()
        ))));
}

#[test]
fn unsupported_pattern_propagates_untranslated() {
    let mut f = fixture();
    f.provider.fail_pattern(PatternId::Invoke);
    f.session.add_property(Property::Name, "Submit").unwrap();
    let err = f.session.invoke().unwrap_err();
    assert!(matches!(err, AutomationError::PatternUnsupported(_)));
}

#[test]
fn action_on_a_missing_element_fails_before_any_pattern_call() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Missing").unwrap();
    let err = f.session.invoke().unwrap_err();
    assert!(matches!(err, AutomationError::ElementNotFound(_)));
    assert!(!f
        .provider
        .calls()
        .iter()
        .any(|c| matches!(c, ProviderCall::Perform(_))));
}

#[test]
fn move_wins_over_resize() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Calculator").unwrap();
    let request = TransformRequest::new()
        .move_to(10.0, 20.0)
        .resize(800.0, 600.0);
    let caps = f.session.transform(request).unwrap();

    let performs: Vec<_> = f
        .provider
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ProviderCall::Perform(_)))
        .collect();
    assert_eq!(
        performs,
        vec![ProviderCall::Perform(PatternOp::Move { x: 10.0, y: 20.0 })]
    );
    assert_eq!(
        caps,
        TransformCapabilities {
            can_move: true,
            can_resize: true,
            can_rotate: false,
        }
    );
}

#[test]
fn resize_wins_over_rotate() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Calculator").unwrap();
    let request = TransformRequest::new().resize(800.0, 600.0).rotate(90.0);
    f.session.transform(request).unwrap();
    assert!(f
        .provider
        .calls()
        .contains(&ProviderCall::Perform(PatternOp::Resize {
            width: 800.0,
            height: 600.0,
        })));
}

#[test]
fn all_sentinel_transform_applies_nothing_but_reports_capabilities() {
    let mut f = fixture();
    f.provider.set_caps(TransformCapabilities {
        can_move: false,
        can_resize: true,
        can_rotate: true,
    });
    f.session.add_property(Property::Name, "Calculator").unwrap();
    let caps = f.session.transform(TransformRequest::new()).unwrap();

    assert!(!f
        .provider
        .calls()
        .iter()
        .any(|c| matches!(c, ProviderCall::Perform(_))));
    assert!(f.provider.calls().contains(&ProviderCall::TransformCaps));
    assert!(!caps.can_move);
}

#[test]
fn a_half_specified_group_is_not_meaningful() {
    // move_y stays NAN, so the move group is incomplete and rotate,
    // the only complete group, is applied.
    let request = TransformRequest {
        move_x: 5.0,
        ..TransformRequest::new()
    }
    .rotate(45.0);
    assert_eq!(
        request.operation(),
        Some(PatternOp::Rotate { degrees: 45.0 })
    );
}

#[test]
fn window_state_is_dispatched_through_the_window_pattern() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Calculator").unwrap();
    f.session.set_window_state("MAX").unwrap();
    assert!(f
        .provider
        .calls()
        .contains(&ProviderCall::Perform(PatternOp::SetWindowState(
            WindowVisualState::Maximized
        ))));
}

#[test]
fn bad_window_state_fails_before_any_provider_call() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Calculator").unwrap();
    let err = f.session.set_window_state("banana").unwrap_err();
    assert!(matches!(err, AutomationError::InvalidArgument(_)));
    assert!(f.provider.calls().is_empty());

    // The query was never consumed; the caller can still resolve it.
    assert!(f.session.exists().unwrap());
}

#[test]
fn send_keys_brackets_the_injection_with_the_settle_delay() {
    let f = fixture_with_delay(Duration::from_millis(25));
    let started = Instant::now();
    f.session.send_keys("hello{ENTER}").unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(f.keyboard.sent(), vec!["hello{ENTER}".to_string()]);
}

#[test]
fn clear_properties_discards_the_in_progress_query() {
    let mut f = fixture();
    f.session.add_property(Property::Name, "Submit").unwrap();
    f.session.clear_properties();
    let err = f.session.resolve_first().unwrap_err();
    assert!(matches!(err, AutomationError::InvalidQuery(_)));
}
