//! Tag selection controller and candidate canonicalization.

use std::sync::Arc;
use std::sync::RwLock;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::SelectionConfig;
use crate::path;

/// Sender half of the selection emission channel.
///
/// Every mutation publishes the full selection, never deltas.
pub type SelectionSender = mpsc::UnboundedSender<Vec<Tag>>;

/// Receiver half of the selection emission channel.
pub type SelectionReceiver = mpsc::UnboundedReceiver<Vec<Tag>>;

/// Creates the emission channel consumed by [`TagSelection::new`].
pub fn selection_channel() -> (SelectionSender, SelectionReceiver) {
    mpsc::unbounded_channel()
}

/// Canonical unit of selection.
///
/// `value` is whatever the extraction policy resolved, usually a primitive
/// but possibly structured; `label` is always a string. Two tags denote the
/// same selection entry when their values are structurally equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Stored value, used for equality.
    pub value: Value,
    /// Display text.
    pub label: String,
}

impl Tag {
    /// Creates a tag whose value and label are the same string.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: Value::String(text.clone()),
            label: text,
        }
    }

    /// Canonicalizes a candidate into a tag.
    ///
    /// Strings map to themselves. For records, the value comes from walking
    /// `value_path` (falling back to `text_path`), then from the first
    /// present non-null of `value`, `id`, `name`, then the record itself.
    /// The label comes from walking `text_path`, then from the first present
    /// non-null of `name`, `title`, `label`, `text`, then the string form of
    /// the resolved value.
    pub fn from_candidate(candidate: &Candidate, config: &SelectionConfig) -> Self {
        match candidate {
            Candidate::Text(text) => Self::text(text.clone()),
            Candidate::Record(record) => {
                let value_path = config
                    .value_path
                    .as_deref()
                    .or_else(|| config.text_path.as_deref());
                let value = value_path
                    .and_then(|p| walk_present(record, p))
                    .or_else(|| field_present(record, &["value", "id", "name"]))
                    .cloned()
                    .unwrap_or_else(|| record.clone());

                let label = config
                    .text_path
                    .as_deref()
                    .and_then(|p| walk_present(record, p))
                    .map(label_string)
                    .unwrap_or_else(|| {
                        field_present(record, &["name", "title", "label", "text"])
                            .map(label_string)
                            .unwrap_or_else(|| label_string(&value))
                    });

                Self { value, label }
            }
        }
    }
}

/// A selectable item before canonicalization.
///
/// This is the boundary between untyped API results or free-typed text and
/// the canonical [`Tag`] form; [`Tag::from_candidate`] is the single
/// narrowing point.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    /// Free-typed text, or a string result item.
    Text(String),
    /// A structured result record.
    Record(Value),
}

impl From<&str> for Candidate {
    fn from(text: &str) -> Self {
        Candidate::Text(text.to_string())
    }
}

impl From<String> for Candidate {
    fn from(text: String) -> Self {
        Candidate::Text(text)
    }
}

impl From<Value> for Candidate {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Candidate::Text(text),
            other => Candidate::Record(other),
        }
    }
}

impl From<&Value> for Candidate {
    fn from(value: &Value) -> Self {
        value.clone().into()
    }
}

/// Ordered, value-deduplicated tag selection synced with an external JSON
/// representation.
///
/// Cheap to clone; clones share the selection. Mutations conclude by
/// sending the full selection through the emission channel, and the host
/// persists or propagates what it receives there.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tagwire_lib::config::SelectionConfig;
/// use tagwire_lib::selection::{selection_channel, TagSelection};
///
/// let (emit, mut changes) = selection_channel();
/// let selection = TagSelection::new(SelectionConfig::default(), emit);
///
/// selection.toggle(&json!({"id": 7, "name": "Cat"}).into());
/// assert!(selection.is_selected(&json!({"id": 7, "name": "Cat"}).into()));
///
/// let emitted = changes.try_recv().unwrap();
/// assert_eq!(emitted[0].label, "Cat");
/// ```
#[derive(Debug, Clone)]
pub struct TagSelection {
    inner: Arc<TagSelectionInner>,
}

#[derive(Debug)]
struct TagSelectionInner {
    config: SelectionConfig,
    items: RwLock<Vec<Tag>>,
    emit: SelectionSender,
}

impl TagSelection {
    /// Creates an empty selection.
    pub fn new(config: SelectionConfig, emit: SelectionSender) -> Self {
        Self {
            inner: Arc::new(TagSelectionInner {
                config,
                items: RwLock::new(Vec::new()),
                emit,
            }),
        }
    }

    /// Creates a selection pre-populated from an external value.
    pub fn with_value(config: SelectionConfig, value: &Value, emit: SelectionSender) -> Self {
        let selection = Self::new(config, emit);
        selection.ingest(value);
        selection
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Snapshot of the current selection, in insertion order.
    pub fn items(&self) -> Vec<Tag> {
        self.inner
            .items
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Number of selected tags.
    pub fn len(&self) -> usize {
        self.inner.items.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when a value-equal entry is already selected.
    pub fn is_selected(&self, candidate: &Candidate) -> bool {
        let tag = Tag::from_candidate(candidate, &self.inner.config);
        self.inner
            .items
            .read()
            .map(|guard| guard.iter().any(|t| t.value == tag.value))
            .unwrap_or(false)
    }

    // ========================================================================
    // Sync with the external representation
    // ========================================================================

    /// Replaces the selection from an externally supplied representation.
    ///
    /// Accepts the shapes the serialized form can take in the wild: an
    /// array of tags, a JSON string encoding one, a single tag object, or
    /// nothing at all. Malformed input never errors; it logs and degrades
    /// to an empty selection. Ingesting does not emit, since the external
    /// side already holds this value.
    pub fn ingest(&self, value: &Value) {
        let items = parse_external(value);
        if let Ok(mut guard) = self.inner.items.write() {
            *guard = items;
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Selects the candidate, or deselects it when already selected.
    pub fn toggle(&self, candidate: &Candidate) {
        let tag = Tag::from_candidate(candidate, &self.inner.config);

        if let Ok(mut guard) = self.inner.items.write() {
            match guard.iter().position(|t| t.value == tag.value) {
                Some(index) => {
                    guard.remove(index);
                }
                None => guard.push(tag),
            }
        }

        self.emit();
    }

    /// Appends a free-typed tag.
    ///
    /// Whitespace-only input is ignored. Skips the presence check `toggle`
    /// performs, so repeated custom text yields repeated entries.
    pub fn add_custom(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        if let Ok(mut guard) = self.inner.items.write() {
            guard.push(Tag::text(trimmed));
        }

        self.emit();
    }

    /// Removes the entry at `index`.
    ///
    /// Out-of-range indices are ignored without emitting.
    pub fn remove_at(&self, index: usize) {
        let removed = self
            .inner
            .items
            .write()
            .map(|mut guard| {
                if index < guard.len() {
                    guard.remove(index);
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false);

        if removed {
            self.emit();
        }
    }

    /// Removes the first entry whose value matches the candidate's.
    ///
    /// Absent values are ignored without emitting.
    pub fn remove_by_match(&self, candidate: &Candidate) {
        let tag = Tag::from_candidate(candidate, &self.inner.config);
        let removed = self
            .inner
            .items
            .write()
            .map(|mut guard| match guard.iter().position(|t| t.value == tag.value) {
                Some(index) => {
                    guard.remove(index);
                    true
                }
                None => false,
            })
            .unwrap_or(false);

        if removed {
            self.emit();
        }
    }

    /// Publishes the full current selection to the emission channel.
    ///
    /// Fire-and-forget: a dropped receiver means the host is shutting down.
    fn emit(&self) {
        let _ = self.inner.emit.send(self.items());
    }
}

fn parse_external(value: &Value) -> Vec<Tag> {
    if is_falsy(value) {
        return Vec::new();
    }

    match value {
        Value::Array(_) => tags_from_json(value.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ Value::Array(_)) => tags_from_json(parsed),
            Ok(parsed) => tags_from_json(Value::Array(vec![parsed])),
            Err(e) => {
                log::warn!("selection value is not valid JSON: {e}");
                Vec::new()
            }
        },
        Value::Object(_) => tags_from_json(Value::Array(vec![value.clone()])),
        other => {
            log::warn!("unexpected selection value: {other}");
            Vec::new()
        }
    }
}

/// Host-side cleared states: null, false, 0, and the empty string.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Deserializes an already-tag-shaped JSON array, degrading to empty.
fn tags_from_json(value: Value) -> Vec<Tag> {
    match serde_json::from_value::<Vec<Tag>>(value) {
        Ok(tags) => tags,
        Err(e) => {
            log::warn!("selection value is not tag-shaped: {e}");
            Vec::new()
        }
    }
}

/// Walks `path` into `record`, treating JSON null as absent.
fn walk_present<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path::walk(record, path).filter(|v| !v.is_null())
}

/// First of `fields` present and non-null on `record`.
fn field_present<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields.iter().find_map(|field| walk_present(record, field))
}

/// String form of a JSON value for use as a label.
///
/// Strings are used as-is, unquoted; everything else uses its compact JSON
/// text.
fn label_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
