//! Atlassian Document Format (ADF) model
//!
//! Only the handful of node and mark kinds this crate generates are modelled
//! as typed variants. Everything else, including known kinds that carry
//! attributes we do not understand, is held as [`Node::Unknown`] so that a
//! document read from disk is written back exactly as it came in.

use crate::error::{AdfError, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Heading shown at the top of every estimation comment
pub const ESTIMATION_HEADING: &str = "AI Story Point Estimation";

/// Closing disclaimer of every estimation comment
pub const ESTIMATION_DISCLAIMER: &str =
    "This is an AI-generated estimate. Team review recommended.";

/// Literal `type` of an ADF root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// `"doc"`
    #[default]
    Doc,
}

/// An ADF root: `{type: "doc", version, content}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Always `doc`
    #[serde(rename = "type")]
    pub kind: DocType,
    /// Format version, at least 1
    pub version: u64,
    /// Top-level block nodes
    pub content: Vec<Node>,
}

impl Document {
    /// A version 1 document with the given blocks
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            kind: DocType::Doc,
            version: 1,
            content,
        }
    }
}

/// A node inside an ADF document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `heading` with `attrs.level`
    Heading {
        /// Heading level, 1 to 6
        level: u8,
        /// Inline children
        content: Vec<Node>,
    },
    /// `paragraph`
    Paragraph {
        /// Inline children
        content: Vec<Node>,
    },
    /// `bulletList`
    BulletList {
        /// `listItem` children
        content: Vec<Node>,
    },
    /// `listItem`
    ListItem {
        /// Block children
        content: Vec<Node>,
    },
    /// `codeBlock` with optional `attrs.language`
    CodeBlock {
        /// Highlighting language, when the block declares one
        language: Option<String>,
        /// Text children
        content: Vec<Node>,
    },
    /// `text` leaf
    Text {
        /// The literal text
        text: String,
        /// Formatting marks, omitted from JSON when empty
        marks: Vec<Mark>,
    },
    /// Any node this model does not cover, kept verbatim
    Unknown(Value),
}

/// Inline formatting on a text node
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Bold
    Strong,
    /// Italic
    Em,
    /// Inline code
    Code,
    /// Any other mark, kept verbatim
    Unknown(Value),
}

impl Node {
    /// Plain text leaf
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Text leaf with a single mark
    pub fn marked(text: impl Into<String>, mark: Mark) -> Self {
        Node::Text {
            text: text.into(),
            marks: vec![mark],
        }
    }

    /// Bold text leaf
    pub fn strong(text: impl Into<String>) -> Self {
        Self::marked(text, Mark::Strong)
    }

    /// Italic text leaf
    pub fn em(text: impl Into<String>) -> Self {
        Self::marked(text, Mark::Em)
    }

    /// Paragraph of inline nodes
    pub fn paragraph(content: Vec<Node>) -> Self {
        Node::Paragraph { content }
    }

    /// Heading of the given level
    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Node::Heading { level, content }
    }

    /// Bullet list of list items
    pub fn bullet_list(items: Vec<Node>) -> Self {
        Node::BulletList { content: items }
    }

    /// List item of block nodes
    pub fn list_item(content: Vec<Node>) -> Self {
        Node::ListItem { content }
    }

    /// Code block holding `text` as its single text node
    pub fn code_block(language: impl Into<String>, text: impl Into<String>) -> Self {
        Node::CodeBlock {
            language: Some(language.into()),
            content: vec![Node::text(text)],
        }
    }

    /// The `type` string of this node, if it has one
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Node::Heading { .. } => Some("heading"),
            Node::Paragraph { .. } => Some("paragraph"),
            Node::BulletList { .. } => Some("bulletList"),
            Node::ListItem { .. } => Some("listItem"),
            Node::CodeBlock { .. } => Some("codeBlock"),
            Node::Text { .. } => Some("text"),
            Node::Unknown(value) => value.get("type").and_then(Value::as_str),
        }
    }

    /// Child nodes, empty for leaves and unknown nodes
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading { content, .. }
            | Node::Paragraph { content }
            | Node::BulletList { content }
            | Node::ListItem { content }
            | Node::CodeBlock { content, .. } => content,
            Node::Text { .. } | Node::Unknown(_) => &[],
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text { text, .. } => text.clone(),
            other => other.children().iter().map(Node::plain_text).collect(),
        }
    }
}

fn only_keys(object: &Map<String, Value>, allowed: &[&str]) -> bool {
    object.keys().all(|key| allowed.contains(&key.as_str()))
}

fn child_nodes(object: &Map<String, Value>) -> Option<Vec<Node>> {
    object
        .get("content")?
        .as_array()
        .map(|items| items.iter().cloned().map(Node::from).collect())
}

fn single_attr<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    let attrs = object.get("attrs")?.as_object()?;
    if attrs.len() == 1 {
        attrs.get(name)
    } else {
        None
    }
}

impl Node {
    fn parse_known(object: &Map<String, Value>) -> Option<Node> {
        let kind = object.get("type")?.as_str()?;
        match kind {
            "heading" if only_keys(object, &["type", "attrs", "content"]) => {
                let level = single_attr(object, "level")?.as_u64()?;
                if !(1..=6).contains(&level) {
                    return None;
                }
                Some(Node::Heading {
                    level: level as u8,
                    content: child_nodes(object)?,
                })
            }
            "paragraph" if only_keys(object, &["type", "content"]) => Some(Node::Paragraph {
                content: child_nodes(object)?,
            }),
            "bulletList" if only_keys(object, &["type", "content"]) => Some(Node::BulletList {
                content: child_nodes(object)?,
            }),
            "listItem" if only_keys(object, &["type", "content"]) => Some(Node::ListItem {
                content: child_nodes(object)?,
            }),
            "codeBlock" if only_keys(object, &["type", "attrs", "content"]) => {
                let language = match object.get("attrs") {
                    None => None,
                    Some(_) => Some(single_attr(object, "language")?.as_str()?.to_string()),
                };
                Some(Node::CodeBlock {
                    language,
                    content: child_nodes(object)?,
                })
            }
            "text" if only_keys(object, &["type", "text", "marks"]) => {
                let text = object.get("text")?.as_str()?.to_string();
                let marks = match object.get("marks") {
                    None => Vec::new(),
                    Some(marks) => {
                        let marks = marks.as_array()?;
                        // An explicit empty list would not survive re-serialization
                        if marks.is_empty() {
                            return None;
                        }
                        marks.iter().cloned().map(Mark::from).collect()
                    }
                };
                Some(Node::Text { text, marks })
            }
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value.as_object().and_then(Node::parse_known) {
            Some(node) => node,
            None => Node::Unknown(value),
        }
    }
}

fn typed(kind: &str) -> Map<String, Value> {
    Map::from_iter([("type".to_string(), Value::from(kind))])
}

fn with_content(kind: &str, content: Vec<Node>) -> Map<String, Value> {
    let mut object = typed(kind);
    object.insert(
        "content".to_string(),
        Value::Array(content.into_iter().map(Value::from).collect()),
    );
    object
}

fn attrs(name: &str, value: Value) -> Value {
    Value::Object(Map::from_iter([(name.to_string(), value)]))
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        let object = match node {
            Node::Heading { level, content } => {
                let mut object = with_content("heading", content);
                object.insert("attrs".to_string(), attrs("level", Value::from(level)));
                object
            }
            Node::Paragraph { content } => with_content("paragraph", content),
            Node::BulletList { content } => with_content("bulletList", content),
            Node::ListItem { content } => with_content("listItem", content),
            Node::CodeBlock { language, content } => {
                let mut object = with_content("codeBlock", content);
                if let Some(language) = language {
                    object.insert("attrs".to_string(), attrs("language", Value::from(language)));
                }
                object
            }
            Node::Text { text, marks } => {
                let mut object = typed("text");
                object.insert("text".to_string(), Value::from(text));
                if !marks.is_empty() {
                    object.insert(
                        "marks".to_string(),
                        Value::Array(marks.into_iter().map(Value::from).collect()),
                    );
                }
                object
            }
            Node::Unknown(value) => return value,
        };
        Value::Object(object)
    }
}

impl From<Value> for Mark {
    fn from(value: Value) -> Self {
        let known = value
            .as_object()
            .filter(|object| object.len() == 1)
            .and_then(|object| object.get("type"))
            .and_then(Value::as_str)
            .and_then(|kind| match kind {
                "strong" => Some(Mark::Strong),
                "em" => Some(Mark::Em),
                "code" => Some(Mark::Code),
                _ => None,
            });
        known.unwrap_or(Mark::Unknown(value))
    }
}

impl From<Mark> for Value {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Strong => Value::Object(typed("strong")),
            Mark::Em => Value::Object(typed("em")),
            Mark::Code => Value::Object(typed("code")),
            Mark::Unknown(value) => value,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

/// Payload accepted by the ticketing REST API when posting a rich comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationComment {
    /// The comment document
    pub body: Document,
}

/// Build the estimation comment document.
///
/// `explanation` is carried byte-for-byte inside a `text` code block so that
/// line breaks and markup in the model output survive.
pub fn build_estimation_document(points: impl fmt::Display, explanation: &str) -> Document {
    Document::new(vec![
        Node::heading(2, vec![Node::text(ESTIMATION_HEADING)]),
        Node::paragraph(vec![
            Node::text("Estimated Effort: "),
            Node::strong(points.to_string()),
            Node::text(" Story Points"),
        ]),
        Node::bullet_list(vec![
            Node::list_item(vec![Node::paragraph(vec![Node::strong("Explanation")])]),
            Node::list_item(vec![
                Node::paragraph(vec![Node::strong("Details (verbatim):")]),
                Node::code_block("text", explanation),
            ]),
        ]),
        Node::paragraph(vec![Node::em(ESTIMATION_DISCLAIMER)]),
    ])
}

/// Build the estimation comment payload
pub fn build_estimation_comment(points: impl fmt::Display, explanation: &str) -> EstimationComment {
    EstimationComment {
        body: build_estimation_document(points, explanation),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn ensure_document<'a>(
    value: &'a Value,
    role: &'static str,
) -> std::result::Result<&'a Map<String, Value>, AdfError> {
    let object = value.as_object().ok_or(AdfError::NotAnObject {
        role,
        found: json_type_name(value),
    })?;

    let is_doc = object.get("type").and_then(Value::as_str) == Some("doc");
    let has_content = object.get("content").is_some_and(Value::is_array);
    if is_doc || has_content {
        Ok(object)
    } else {
        Err(AdfError::NotADocument { role })
    }
}

fn version_of(
    object: &Map<String, Value>,
    role: &'static str,
) -> std::result::Result<u64, AdfError> {
    let Some(version) = object.get("version") else {
        return Ok(1);
    };

    // Whole-valued floats such as `2.0` count as integers
    version
        .as_u64()
        .or_else(|| {
            version
                .as_f64()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u64::MAX as f64)
                .map(|v| v as u64)
        })
        .ok_or_else(|| AdfError::InvalidVersion {
            role,
            found: version.to_string(),
        })
}

fn content_of(object: &Map<String, Value>) -> &[Value] {
    object
        .get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Append `enhanced` to `original`.
///
/// Both inputs must be ADF roots or fragments exposing a `content` list. The
/// result is a fresh `doc` whose version is the larger of the two (missing
/// versions count as 1, whole-valued floats like `2.0` count as integers)
/// and whose content is the original blocks followed by the enhanced blocks,
/// untouched. Any other `version` value is rejected.
pub fn merge(original: &Value, enhanced: &Value) -> std::result::Result<Document, AdfError> {
    let original = ensure_document(original, "original")?;
    let enhanced = ensure_document(enhanced, "enhanced")?;

    let content = content_of(original)
        .iter()
        .chain(content_of(enhanced))
        .cloned()
        .map(Node::from)
        .collect();

    Ok(Document {
        kind: DocType::Doc,
        version: version_of(original, "original")?.max(version_of(enhanced, "enhanced")?),
        content,
    })
}

/// Read a JSON document from disk
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Write `value` as pretty-printed UTF-8 JSON, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Merge two documents on disk into `output`
pub fn merge_files(original: &Path, enhanced: &Path, output: &Path) -> Result<Document> {
    let merged = merge(&read_document(original)?, &read_document(enhanced)?)?;
    write_json(output, &merged)?;
    tracing::debug!(
        "Merged {} and {} into {} ({} blocks)",
        original.display(),
        enhanced.display(),
        output.display(),
        merged.content.len()
    );
    Ok(merged)
}

/// Write the estimation comment payload to `output`
pub fn write_estimation(points: impl fmt::Display, explanation: &str, output: &Path) -> Result<()> {
    write_json(output, &build_estimation_comment(points, explanation))
}
