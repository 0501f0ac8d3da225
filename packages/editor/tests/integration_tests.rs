//! Integration tests for editor crate

use serde_json::json;
use std::sync::Arc;
use uibuilder_components::ComponentRegistry;
use uibuilder_editor::{
    Document, EditSession, EditorError, Selection, SelectionCoordinator, StepError, Transaction,
};
use uibuilder_model::{Attrs, Node};

fn registry() -> ComponentRegistry {
    ComponentRegistry::with_builtin_components()
}

fn component(kind: &str, id: &str) -> Node {
    let mut attrs = Attrs::new();
    attrs.insert("id".to_string(), json!(id));
    Node::component(kind, attrs)
}

fn nested_document() -> Document {
    let inner = component("container", "container-2")
        .with_content(vec![component("button", "button-3"), Node::paragraph("deep")]);
    let outer = component("container", "container-1").with_content(vec![
        Node::paragraph("first"),
        inner,
        component("button", "button-4"),
    ]);
    Document::from_node(Node::document(vec![
        Node::paragraph("Intro"),
        component("button", "button-1"),
        outer,
        Node::paragraph(""),
        component("button", "button-5"),
    ]))
}

#[test]
fn test_select_node_selects_every_id() -> anyhow::Result<()> {
    let registry = registry();
    let mut doc = nested_document();
    let mut coordinator = SelectionCoordinator::new();

    let ids: Vec<String> = doc
        .tree()
        .descendants()
        .filter_map(|(node, _)| node.id().map(str::to_string))
        .collect();
    assert_eq!(ids.len(), 6);

    for id in ids {
        let (_, pos) = doc.find_node_by_id(&id).expect("id present");
        doc.set_selection(pos, &registry)?;
        coordinator.sync(&doc);
        assert_eq!(coordinator.selected_node_id(), Some(id.as_str()));
    }

    Ok(())
}

#[test]
fn test_insert_inside_atomic_node_leaves_snapshot_unchanged() {
    let registry = registry();
    let mut doc = nested_document();
    let (_, pos) = doc.find_node_by_id("button-1").expect("button present");

    let before = doc.snapshot();
    let before_tree = (*before).clone();
    let before_selection = doc.selection();

    let err = doc
        .insert_node(pos + 1, component("button", "button-9"), &registry)
        .unwrap_err();

    assert!(matches!(
        err,
        EditorError::Step(StepError::InvalidPosition { .. })
    ));
    assert_eq!(doc.tree(), &before_tree);
    assert!(Arc::ptr_eq(&before, &doc.snapshot()));
    assert_eq!(doc.selection(), before_selection);
    assert_eq!(doc.version, 0);
}

#[test]
fn test_insert_scenario_button_at_root() -> anyhow::Result<()> {
    let registry = registry();
    let mut doc = Document::from_node(Node::document(vec![]));

    let mut attrs = Attrs::new();
    attrs.insert("id".to_string(), json!("button-1"));
    attrs.insert("text".to_string(), json!("Save"));
    attrs.insert("variant".to_string(), json!("secondary"));
    attrs.insert("size".to_string(), json!("small"));
    attrs.insert("disabled".to_string(), json!(false));

    doc.insert_node(0, Node::component("button", attrs), &registry)?;

    let (node, pos) = doc.find_node_by_id("button-1").expect("inserted");
    assert_eq!(pos, 0);
    let attrs = node.attrs().expect("component attrs");
    let keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "text", "variant", "size", "disabled"]);
    assert_eq!(attrs["variant"], "secondary");

    Ok(())
}

#[test]
fn test_old_snapshots_survive_edits() -> anyhow::Result<()> {
    let registry = registry();
    let mut doc = nested_document();
    let first = doc.snapshot();

    doc.dispatch(
        &Transaction::new()
            .remove_node("container-2")
            .insert_node(0, Node::paragraph("Title")),
        &registry,
    )?;

    assert!(first.find_by_id("container-2").is_some());
    assert!(doc.find_node_by_id("container-2").is_none());
    assert_eq!(doc.tree().content()[0].text_content(), "Title");
    // the trailing button subtree was never touched
    assert!(Arc::ptr_eq(
        &first.content()[4],
        &doc.tree().content()[5]
    ));

    Ok(())
}

#[test]
fn test_replace_selection_with_caret_inserts() -> anyhow::Result<()> {
    let registry = registry();
    let mut doc = Document::from_node(Node::document(vec![Node::paragraph("Hello")]));
    doc.set_selection(3, &registry)?;
    assert_eq!(doc.selection(), Selection::caret(3));

    doc.replace_selection(component("button", "button-1"), &registry)?;

    let texts: Vec<String> = doc
        .tree()
        .content()
        .iter()
        .map(|node| format!("{}:{}", node.type_name(), node.text_content()))
        .collect();
    assert_eq!(texts, vec!["paragraph:He", "button:", "paragraph:llo"]);

    Ok(())
}

#[test]
fn test_session_workflow() {
    let registry = Arc::new(registry());
    let mut session = EditSession::new("client-1", Document::new(), registry);

    let button = session.insert_component("button").expect("button inserted");
    // a node selection would be replaced, so move to the trailing paragraph
    assert!(session.set_selection(session.document().tree().content_size()));
    let container = session.insert_component("container").expect("container inserted");
    assert_ne!(button, container);
    assert_eq!(session.selected_node_id(), Some(container.as_str()));

    assert!(session.select_node(&button));
    assert_eq!(session.selected_node_id(), Some(button.as_str()));

    session.start_editing(&button);
    assert!(session.remove_node(&button));
    assert_eq!(session.editing_state(), &uibuilder_editor::EditingState::Viewing);

    assert!(!session.select_node(&button));
    assert_eq!(session.insert_component("carousel"), None);
}

#[test]
fn test_component_inside_unregistered_node_stays_selected() -> anyhow::Result<()> {
    let registry = registry();
    let legacy = component("legacy-widget", "legacy-1")
        .with_content(vec![component("button", "button-7")]);
    let mut doc = Document::from_node(Node::document(vec![Node::paragraph("a"), legacy]));
    let mut coordinator = SelectionCoordinator::new();

    let (_, pos) = doc.find_node_by_id("button-7").expect("button present");
    doc.set_selection(pos, &registry)?;
    coordinator.sync(&doc);
    assert_eq!(coordinator.selected_node_id(), Some("button-7"));

    let (_, pos) = doc.find_node_by_id("legacy-1").expect("legacy node present");
    doc.set_selection(pos, &registry)?;
    coordinator.sync(&doc);
    assert_eq!(coordinator.selected_node_id(), Some("legacy-1"));

    Ok(())
}

#[test]
fn test_inserted_attributes_fall_back_per_attribute() -> anyhow::Result<()> {
    let registry = registry();
    let mut doc = Document::new();

    let mut attrs = Attrs::new();
    attrs.insert("id".to_string(), json!("button-1"));
    attrs.insert("text".to_string(), json!("Save"));
    attrs.insert("variant".to_string(), json!("huge"));
    attrs.insert("size".to_string(), json!("large"));
    attrs.insert("disabled".to_string(), json!("yes"));
    doc.insert_node(0, Node::component("button", attrs), &registry)?;

    let (button, _) = doc.find_node_by_id("button-1").expect("button inserted");
    assert_eq!(
        serde_json::to_value(button.attrs().expect("component attrs"))?,
        json!({
            "id": "button-1",
            "text": "Save",
            "variant": "primary",
            "size": "large",
            "disabled": false
        })
    );

    let mut attrs = Attrs::new();
    attrs.insert("id".to_string(), json!("container-2"));
    attrs.insert("gap".to_string(), json!("12"));
    doc.insert_node(0, Node::component("container", attrs), &registry)?;

    let (container, _) = doc.find_node_by_id("container-2").expect("container inserted");
    let attrs = container.attrs().expect("component attrs");
    assert_eq!(attrs["gap"], json!(12));
    assert_eq!(attrs["direction"], json!("column"));

    Ok(())
}

#[test]
fn test_session_updates_coerce_and_fall_back() {
    let registry = Arc::new(registry());
    let mut session = EditSession::new("client-1", Document::new(), registry);
    let button = session.insert_component("button").expect("button inserted");

    let mut attrs = Attrs::new();
    attrs.insert("variant".to_string(), json!("secondary"));
    attrs.insert("disabled".to_string(), json!("true"));
    assert!(session.update_attributes(&button, attrs));

    let attrs_of = |session: &EditSession| {
        session
            .document()
            .find_node_by_id(&button)
            .and_then(|(node, _)| node.attrs().cloned())
            .expect("button present")
    };
    let attrs = attrs_of(&session);
    assert_eq!(attrs["variant"], json!("secondary"));
    assert_eq!(attrs["disabled"], json!(true));

    // a value outside the schema resets that attribute only
    let mut update = Attrs::new();
    update.insert("variant".to_string(), json!("huge"));
    update.insert("text".to_string(), json!("Go"));
    assert!(session.update_attributes(&button, update));

    let attrs = attrs_of(&session);
    assert_eq!(attrs["variant"], json!("primary"));
    assert_eq!(attrs["text"], json!("Go"));
    assert_eq!(attrs["disabled"], json!(true));
    assert_eq!(attrs["id"], json!(button));
}
