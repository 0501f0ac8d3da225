use crate::{from_html, to_html, CompileOptions};
use serde_json::{json, Value};
use uibuilder_components::ComponentRegistry;
use uibuilder_model::{Attrs, Node, ParseError};

fn registry() -> ComponentRegistry {
    ComponentRegistry::with_builtin_components()
}

fn component(kind: &str, attrs: Value) -> Node {
    let registry = registry();
    let raw = attrs.as_object().cloned().unwrap_or_default();
    let attrs = match registry.get(kind) {
        Some(definition) => definition.normalize(&raw),
        None => raw,
    };
    Node::component(kind, attrs)
}

fn scenario_button() -> Node {
    component(
        "button",
        json!({
            "id": "button-1",
            "text": "Save",
            "variant": "secondary",
            "size": "small",
            "disabled": false
        }),
    )
}

fn sample() -> Node {
    let container = component("container", json!({ "id": "container-1", "gap": 16 }))
        .with_content(vec![
            Node::paragraph("inside"),
            component("button", json!({ "id": "button-2", "disabled": true })),
        ]);
    Node::document(vec![
        Node::paragraph("Fish & <chips> \"now\""),
        Node::paragraph(""),
        scenario_button(),
        container,
    ])
}

#[test]
fn test_compile_scenario_button() {
    let doc = Node::document(vec![scenario_button()]);
    let html = to_html(&doc, &registry(), CompileOptions::default());

    println!("Generated HTML:\n{}", html);

    assert_eq!(
        html,
        "<button data-type=\"ui-button\" data-id=\"button-1\" data-variant=\"secondary\" data-size=\"small\">Save</button>"
    );
    assert!(!html.contains("disabled"));
}

#[test]
fn test_compile_disabled_button() {
    let doc = Node::document(vec![component("button", json!({ "disabled": true }))]);
    let html = to_html(&doc, &registry(), CompileOptions::default());
    assert!(html.contains(" disabled=\"disabled\""));
    assert!(html.contains(">Click me</button>"));
}

#[test]
fn test_compile_paragraphs_escaped() {
    let doc = Node::document(vec![Node::paragraph("a & <b>"), Node::paragraph("")]);
    let html = to_html(&doc, &registry(), CompileOptions::default());
    assert_eq!(html, "<p>a &amp; &lt;b&gt;</p><p></p>");
}

#[test]
fn test_compile_container_children() {
    let html = to_html(&sample(), &registry(), CompileOptions::default());
    assert!(html.contains(
        "<div data-type=\"ui-container\" data-id=\"container-1\" data-direction=\"column\" data-gap=\"16\"><p>inside</p><button"
    ));
    assert!(html.ends_with("</button></div>"));
}

#[test]
fn test_compile_pretty() {
    let options = CompileOptions {
        pretty: true,
        ..Default::default()
    };
    let html = to_html(&sample(), &registry(), options);
    let lines: Vec<&str> = html.lines().collect();

    assert_eq!(lines[0], "<p>Fish &amp; &lt;chips&gt; &quot;now&quot;</p>");
    assert!(lines[3].starts_with("<div data-type=\"ui-container\""));
    assert_eq!(lines[4], "  <p>inside</p>");
    assert!(lines[5].starts_with("  <button"));
    assert_eq!(lines[6], "</div>");
}

#[test]
fn test_compile_standalone() {
    let options = CompileOptions {
        standalone: true,
        pretty: true,
        title: "Landing".to_string(),
        ..Default::default()
    };
    let html = to_html(&Node::document(vec![Node::paragraph("Hi")]), &registry(), options);

    assert!(html.starts_with("<!DOCTYPE html>\n<html>\n"));
    assert!(html.contains("    <title>Landing</title>\n"));
    assert!(html.contains("    <p>Hi</p>\n"));
    assert!(html.ends_with("</body>\n</html>\n"));
}

#[test]
fn test_orphan_renders_nothing() {
    let registry = registry();
    let with_orphan = Node::document(vec![
        Node::paragraph("before"),
        Node::component("legacy-widget", Attrs::new()).with_content(vec![Node::paragraph("x")]),
        scenario_button(),
    ]);
    let without = Node::document(vec![Node::paragraph("before"), scenario_button()]);

    for pretty in [false, true] {
        let options = CompileOptions {
            pretty,
            ..Default::default()
        };
        assert_eq!(
            to_html(&with_orphan, &registry, options.clone()),
            to_html(&without, &registry, options)
        );
    }
}

#[test]
fn test_html_round_trip() {
    let registry = registry();
    let doc = sample();

    for pretty in [false, true] {
        let options = CompileOptions {
            pretty,
            ..Default::default()
        };
        let html = to_html(&doc, &registry, options);
        assert_eq!(from_html(&html, &registry).unwrap(), doc);
    }
}

#[test]
fn test_standalone_round_trip() {
    let registry = registry();
    let doc = sample();
    let options = CompileOptions {
        standalone: true,
        pretty: true,
        ..Default::default()
    };

    let html = to_html(&doc, &registry, options);
    assert_eq!(from_html(&html, &registry).unwrap(), doc);
}

#[test]
fn test_parse_hand_written_markup() {
    let source = r#"<body>
        <h1>Welcome</h1>
        <button data-type="ui-button" data-variant="outline" disabled>Go</button>
        <div data-type="ui-slider">unknown widget</div>
        <p>Plain <strong>bold</strong> text</p>
    </body>"#;

    let doc = from_html(source, &registry()).unwrap();
    let content = doc.content();

    assert_eq!(content.len(), 4);
    assert_eq!(content[0].text_content(), "Welcome");
    let attrs = content[1].attrs().unwrap();
    assert_eq!(attrs["text"], "Go");
    assert_eq!(attrs["variant"], "outline");
    assert_eq!(attrs["size"], "medium");
    assert_eq!(attrs["disabled"], true);
    assert_eq!(content[2].text_content(), "unknown widget");
    assert_eq!(content[3].text_content(), "Plain bold text");
}

#[test]
fn test_parse_rejects_broken_markup() {
    let registry = registry();
    assert!(matches!(
        from_html("<p>never closed", &registry),
        Err(ParseError::InvalidMarkup { .. })
    ));
    assert!(matches!(
        from_html("<p>mismatch</div>", &registry),
        Err(ParseError::InvalidMarkup { .. })
    ));
}
