//! HTML import
//!
//! Reads markup produced by [`to_html`](crate::to_html), or authored by
//! hand, back into a document. Elements recognized by a registered
//! contract become components, `<p>` becomes a paragraph, and every other
//! element is transparent: its content is kept, the element itself is not.
//! Loose text between blocks becomes its own paragraph. `<head>`,
//! `<script>`, `<style>` and `<title>` are dropped entirely.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use uibuilder_components::{ComponentDefinition, ComponentRegistry, HtmlElement};
use uibuilder_model::{Node, ParseError, ParseResult};

const SKIPPED_TAGS: [&str; 4] = ["head", "script", "style", "title"];

enum Frame<'r> {
    Root {
        blocks: Vec<Node>,
    },
    Paragraph {
        text: String,
    },
    Component {
        definition: &'r ComponentDefinition,
        element: HtmlElement,
        blocks: Vec<Node>,
    },
    Transparent,
    Skipped,
}

struct TreeBuilder<'r> {
    registry: &'r ComponentRegistry,
    stack: Vec<Frame<'r>>,
}

impl<'r> TreeBuilder<'r> {
    fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            stack: vec![Frame::Root { blocks: vec![] }],
        }
    }

    fn open(&mut self, element: HtmlElement) {
        let frame = if matches!(self.stack.last(), Some(Frame::Skipped))
            || SKIPPED_TAGS.contains(&element.tag.as_str())
        {
            Frame::Skipped
        } else if let Some(definition) = self.registry.find_for_element(&element) {
            Frame::Component {
                definition,
                element,
                blocks: vec![],
            }
        } else if element.tag == "p" {
            Frame::Paragraph {
                text: String::new(),
            }
        } else {
            Frame::Transparent
        };

        self.stack.push(frame);
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }

        let node = match self.stack.pop() {
            Some(Frame::Paragraph { text }) => Node::paragraph(&text),
            Some(Frame::Component {
                definition,
                element,
                blocks,
            }) => {
                let node = Node::component(definition.id(), definition.parse_external(&element));
                if definition.is_atom() {
                    node
                } else {
                    node.with_content(blocks)
                }
            }
            _ => return,
        };

        self.push_block(node);
    }

    fn text(&mut self, text: &str) {
        let Some(index) = self
            .stack
            .iter()
            .rposition(|frame| !matches!(frame, Frame::Transparent))
        else {
            return;
        };

        let loose = match &mut self.stack[index] {
            Frame::Skipped => None,
            Frame::Paragraph { text: buffer } => {
                buffer.push_str(text);
                None
            }
            Frame::Component {
                definition,
                element,
                ..
            } if definition.is_atom() => {
                element.text.push_str(text);
                None
            }
            _ => Some(text.trim()),
        };

        if let Some(loose) = loose.filter(|text| !text.is_empty()) {
            self.push_block(Node::paragraph(loose));
        }
    }

    /// Append a finished block to the innermost frame that holds blocks
    fn push_block(&mut self, node: Node) {
        let target = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Root { blocks } => Some(blocks),
            Frame::Component {
                definition, blocks, ..
            } if !definition.is_atom() => Some(blocks),
            _ => None,
        });

        if let Some(blocks) = target {
            blocks.push(node);
        }
    }

    fn finish(mut self, pos: usize) -> ParseResult<Node> {
        if self.stack.len() > 1 {
            return Err(ParseError::invalid_markup(
                pos,
                "unclosed element at end of input",
            ));
        }

        match self.stack.pop() {
            Some(Frame::Root { blocks }) => Ok(Node::document(blocks)),
            _ => Err(ParseError::invalid_markup(pos, "document root was lost")),
        }
    }
}

/// Read a document back from HTML
pub fn from_html(source: &str, registry: &ComponentRegistry) -> ParseResult<Node> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(false);

    let mut builder = TreeBuilder::new(registry);

    loop {
        let pos = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(ref e)) => builder.open(read_element(e, pos)?),
            Ok(Event::Empty(ref e)) => {
                builder.open(read_element(e, pos)?);
                builder.close();
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ParseError::invalid_markup(pos, err.to_string()))?;
                builder.text(&text);
            }
            Ok(Event::CData(e)) => {
                builder.text(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            // comments, doctype, declarations, processing instructions
            Ok(_) => {}
            Err(err) => {
                return Err(ParseError::invalid_markup(
                    reader.buffer_position(),
                    err.to_string(),
                ))
            }
        }
    }

    builder.finish(reader.buffer_position())
}

fn read_element(start: &BytesStart<'_>, pos: usize) -> ParseResult<HtmlElement> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    let mut element = HtmlElement::new(tag);

    for attr in start.html_attributes() {
        let attr = attr.map_err(|err| ParseError::invalid_markup(pos, err.to_string()))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = attr
            .unescape_value()
            .map_err(|err| ParseError::invalid_markup(pos, err.to_string()))?;
        element.attributes.push((name, value.into_owned()));
    }

    Ok(element)
}
