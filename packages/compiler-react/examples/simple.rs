use uibuilder_compiler_react::{compile_to_react, CompileOptions};
use uibuilder_components::ComponentRegistry;
use uibuilder_model::from_json;

fn main() {
    let source = r#"{
  "type": "document",
  "content": [
    { "type": "paragraph", "content": [{ "type": "text", "text": "Newsletter" }] },
    {
      "type": "container",
      "attrs": { "id": "container-1", "direction": "row", "gap": 12 },
      "content": [
        { "type": "paragraph", "content": [{ "type": "text", "text": "Stay in the loop" }] },
        { "type": "button", "attrs": { "id": "button-1", "text": "Subscribe", "variant": "primary" } }
      ]
    }
  ]
}"#;

    println!("Compiling document to React...\n");

    let registry = ComponentRegistry::with_builtin_components();
    match from_json(source) {
        Ok(document) => {
            let options = CompileOptions {
                use_typescript: true,
                ..Default::default()
            };
            match compile_to_react(&document, &registry, options) {
                Ok(react_code) => {
                    println!("✅ Successfully compiled!\n");
                    println!("Generated React code:");
                    println!("{}", "=".repeat(80));
                    println!("{}", react_code);
                    println!("{}", "=".repeat(80));
                }
                Err(e) => {
                    eprintln!("❌ Compilation error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("❌ Parse error: {}", e);
            std::process::exit(1);
        }
    }
}
