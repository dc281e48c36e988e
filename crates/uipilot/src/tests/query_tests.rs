use crate::errors::AutomationError;
use crate::patterns::{PatternId, PatternOp, TransformCapabilities, WindowVisualState};
use crate::query::{Property, PropertyQuery};

#[test]
fn duplicate_property_key_is_rejected() {
    let mut query = PropertyQuery::new();
    query.insert(Property::Name, "Submit").unwrap();
    let err = query.insert(Property::Name, "Cancel").unwrap_err();
    assert!(matches!(err, AutomationError::InvalidQuery(_)));
    // The existing clause survives untouched.
    assert_eq!(query.clauses(), &[(Property::Name, "Submit".to_string())]);
}

#[test]
fn clauses_keep_insertion_order() {
    let mut query = PropertyQuery::new();
    query.insert(Property::ClassName, "ListBox").unwrap();
    query.insert(Property::Name, "Chats").unwrap();
    let keys: Vec<Property> = query.clauses().iter().map(|(p, _)| *p).collect();
    assert_eq!(keys, vec![Property::ClassName, Property::Name]);
}

#[test]
fn clear_empties_the_query() {
    let mut query = PropertyQuery::single(Property::Name, "Submit");
    assert_eq!(query.len(), 1);
    query.clear();
    assert!(query.is_empty());
}

#[test]
fn property_ids_match_the_native_table() {
    assert_eq!(Property::Name.native_id(), 30005);
    assert_eq!(Property::ClassName.native_id(), 30012);
    assert_eq!(Property::LocalizedControlType.native_id(), 30004);
    assert_eq!(Property::AutomationId.native_id(), 30011);
    assert_eq!(Property::ControlType.native_id(), 30003);
    assert_eq!(Property::AriaRole.native_id(), 30101);
    assert_eq!(Property::FrameworkId.native_id(), 30024);
}

#[test]
fn pattern_ids_match_the_native_table() {
    assert_eq!(PatternId::Invoke.native_id(), 10000);
    assert_eq!(PatternId::Selection.native_id(), 10001);
    assert_eq!(PatternId::Value.native_id(), 10002);
    assert_eq!(PatternId::ExpandCollapse.native_id(), 10005);
    assert_eq!(PatternId::Window.native_id(), 10009);
    assert_eq!(PatternId::SelectionItem.native_id(), 10010);
    assert_eq!(PatternId::Transform.native_id(), 10016);
    assert_eq!(PatternId::ScrollItem.native_id(), 10017);
    assert_eq!(PatternId::LegacyIAccessible.native_id(), 10018);
    assert_eq!(PatternId::VirtualizedItem.native_id(), 10020);
}

#[test]
fn ops_map_to_their_patterns() {
    assert_eq!(PatternOp::Invoke.pattern(), PatternId::Invoke);
    assert_eq!(PatternOp::Expand.pattern(), PatternId::ExpandCollapse);
    assert_eq!(PatternOp::Collapse.pattern(), PatternId::ExpandCollapse);
    assert_eq!(PatternOp::Select.pattern(), PatternId::SelectionItem);
    assert_eq!(PatternOp::Realize.pattern(), PatternId::VirtualizedItem);
    assert_eq!(
        PatternOp::Move { x: 1.0, y: 2.0 }.pattern(),
        PatternId::Transform
    );
    assert_eq!(
        PatternOp::SetValue("x".to_string()).pattern(),
        PatternId::Value
    );
    assert_eq!(
        PatternOp::SetWindowState(WindowVisualState::Normal).pattern(),
        PatternId::Window
    );
}

#[test]
fn window_state_parses_case_insensitively() {
    assert_eq!(
        WindowVisualState::parse("MIN").unwrap(),
        WindowVisualState::Minimized
    );
    assert_eq!(
        WindowVisualState::parse("Max").unwrap(),
        WindowVisualState::Maximized
    );
    assert_eq!(
        WindowVisualState::parse("normal").unwrap(),
        WindowVisualState::Normal
    );
}

#[test]
fn unknown_window_state_is_an_invalid_argument() {
    let err = WindowVisualState::parse("banana").unwrap_err();
    assert!(matches!(err, AutomationError::InvalidArgument(_)));
}

#[test]
fn vocabulary_types_round_trip_through_json() {
    let json = serde_json::to_string(&Property::AutomationId).unwrap();
    let parsed: Property = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, Property::AutomationId);

    let caps = TransformCapabilities {
        can_move: true,
        can_resize: false,
        can_rotate: true,
    };
    let json = serde_json::to_string(&caps).unwrap();
    assert!(json.contains("\"can_move\":true"));
    let parsed: TransformCapabilities = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, caps);
}
