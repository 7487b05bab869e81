//! Decoding of `uiautomator dump` output into a tree of nodes

use crate::error::{AdbError, Result};
use crate::uixml::bounds::{parse_bounds, Rect};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::io::Read;
use tracing::{debug, warn};

/// Root of a decoded UI dump (the `<hierarchy>` element)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    /// Screen rotation as written by the device ("0", "90", ...)
    pub rotation: String,
    /// Top-level nodes in document order
    pub nodes: Vec<Node>,
}

/// One UI element of the dump
///
/// Every attribute is kept as the literal text of the dump. Flags such as
/// `clickable` hold `"true"` or `"false"` and are compared as strings.
/// Attributes missing from the dump are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(rename = "NAF")]
    pub naf: String,
    pub index: String,
    pub text: String,
    #[serde(rename = "resource-id")]
    pub resource_id: String,
    pub class: String,
    pub package: String,
    #[serde(rename = "content-desc")]
    pub content_desc: String,
    pub checkable: String,
    pub checked: String,
    pub clickable: String,
    pub enabled: String,
    pub focusable: String,
    pub focused: String,
    pub scrollable: String,
    #[serde(rename = "long-clickable")]
    pub long_clickable: String,
    pub password: String,
    pub selected: String,
    pub bounds: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Hierarchy {
    /// Decode a full UI dump
    ///
    /// Content before the `<hierarchy>` element (declaration, comments,
    /// whitespace) and anything after it closes is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let rotation = root_rotation(e)?;
                    let nodes = read_nodes(&mut reader)?;
                    return Ok(Self::decoded(rotation, nodes));
                }
                Ok(Event::Empty(ref e)) => {
                    let rotation = root_rotation(e)?;
                    return Ok(Self::decoded(rotation, Vec::new()));
                }
                Ok(Event::End(ref e)) => {
                    return Err(AdbError::MalformedDocument(format!(
                        "unexpected closing tag </{}> before root",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                Ok(Event::Eof) => {
                    return Err(AdbError::MalformedDocument(
                        "no <hierarchy> element found".to_string(),
                    ));
                }
                Ok(_) => {}
                Err(e) => return Err(positioned(&reader, e)),
            }
        }
    }

    /// Decode a UI dump from any reader
    ///
    /// Read failures are `Io`; bytes that are not UTF-8 are a malformed
    /// document.
    pub fn from_reader<R: Read>(mut source: R) -> Result<Self> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(AdbError::malformed)?;
        Self::parse(&text)
    }

    /// Numeric rotation, when the attribute holds one
    pub fn rotation_degrees(&self) -> Option<u16> {
        self.rotation.trim().parse().ok()
    }

    fn decoded(rotation: String, nodes: Vec<Node>) -> Self {
        let hierarchy = Self { rotation, nodes };
        debug!(
            "Decoded UI dump: rotation={:?}, top-level nodes={}, total nodes={}",
            hierarchy.rotation,
            hierarchy.nodes.len(),
            hierarchy.node_count()
        );
        hierarchy
    }
}

impl Node {
    /// Parsed bounding box of this node
    pub fn rect(&self) -> Result<Rect> {
        parse_bounds(&self.bounds)
    }

    /// Tap target for this node
    ///
    /// Unparsable bounds yield `(0, 0)` instead of an error; callers rely on
    /// that sentinel.
    pub fn center(&self) -> (i32, i32) {
        match self.rect() {
            Ok(rect) => rect.center(),
            Err(e) => {
                warn!("Falling back to (0, 0) for node center: {}", e);
                (0, 0)
            }
        }
    }

    /// Placeholder nodes carry no class name and are never search results
    pub fn is_placeholder(&self) -> bool {
        self.class.is_empty()
    }

    fn from_element(e: &BytesStart) -> Result<Self> {
        let mut node = Node::default();

        for attr in e.attributes() {
            let attr = attr.map_err(AdbError::malformed)?;
            let value = attr.unescape_value().map_err(AdbError::malformed)?.into_owned();

            let slot = match attr.key.as_ref() {
                b"NAF" => &mut node.naf,
                b"index" => &mut node.index,
                b"text" => &mut node.text,
                b"resource-id" => &mut node.resource_id,
                b"class" => &mut node.class,
                b"package" => &mut node.package,
                b"content-desc" => &mut node.content_desc,
                b"checkable" => &mut node.checkable,
                b"checked" => &mut node.checked,
                b"clickable" => &mut node.clickable,
                b"enabled" => &mut node.enabled,
                b"focusable" => &mut node.focusable,
                b"focused" => &mut node.focused,
                b"scrollable" => &mut node.scrollable,
                b"long-clickable" => &mut node.long_clickable,
                b"password" => &mut node.password,
                b"selected" => &mut node.selected,
                b"bounds" => &mut node.bounds,
                _ => continue,
            };
            *slot = value;
        }

        Ok(node)
    }
}

fn root_rotation(e: &BytesStart) -> Result<String> {
    if e.name().as_ref() != b"hierarchy" {
        return Err(AdbError::MalformedDocument(format!(
            "expected <hierarchy> root, found <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        )));
    }

    for attr in e.attributes() {
        let attr = attr.map_err(AdbError::malformed)?;
        if attr.key.as_ref() == b"rotation" {
            return Ok(attr.unescape_value().map_err(AdbError::malformed)?.into_owned());
        }
    }
    Ok(String::new())
}

impl Drop for Hierarchy {
    fn drop(&mut self) {
        release(&mut self.nodes);
    }
}

/// Drop a forest without recursing once per nesting level
fn release(nodes: &mut Vec<Node>) {
    let mut pending = std::mem::take(nodes);
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.children);
    }
}

/// Nodes decoded so far: finished top-level nodes plus the chain of
/// `<node>` elements still open, innermost last
#[derive(Default)]
struct TreeBuilder {
    top_level: Vec<Node>,
    open: Vec<Node>,
}

impl TreeBuilder {
    /// Hang a finished node under the innermost open element
    fn attach(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.top_level.push(node),
        }
    }
}

impl Drop for TreeBuilder {
    fn drop(&mut self) {
        release(&mut self.top_level);
        release(&mut self.open);
    }
}

/// Read `<node>` elements until the root element closes
///
/// Nesting is tracked on the heap, so document depth is bounded by memory
/// rather than by the call stack.
fn read_nodes(reader: &mut Reader<&[u8]>) -> Result<Vec<Node>> {
    let mut tree = TreeBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"node" => {
                tree.open.push(Node::from_element(e)?);
            }
            Ok(Event::Start(ref e)) => {
                // Unknown element: skip it along with anything nested inside.
                reader
                    .read_to_end(e.name())
                    .map_err(|err| positioned(reader, err))?;
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"node" => {
                let node = Node::from_element(e)?;
                tree.attach(node);
            }
            Ok(Event::End(_)) => match tree.open.pop() {
                Some(node) => tree.attach(node),
                // Closes the root element
                None => return Ok(std::mem::take(&mut tree.top_level)),
            },
            Ok(Event::Eof) => {
                return Err(AdbError::MalformedDocument(
                    "unexpected end of document inside element".to_string(),
                ));
            }
            Ok(_) => {}
            Err(e) => return Err(positioned(reader, e)),
        }
    }
}

fn positioned(reader: &Reader<&[u8]>, err: quick_xml::Error) -> AdbError {
    AdbError::MalformedDocument(format!("at byte {}: {}", reader.buffer_position(), err))
}
