//! Normalized script output.

use serde::{Deserialize, Serialize};

use crate::option::{Choice, MappingEntry, display_value};
use crate::render::DynamicRenderType;

/// What one parameter evaluation produced.
///
/// Results live for a single resolution pass and are never persisted with
/// the definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedResult {
    /// An ordered list of values.
    Sequence {
        /// The values in script order.
        choices: Vec<Choice>,
    },
    /// Keys offered under display labels.
    Mapping {
        /// The entries in script order.
        entries: Vec<MappingEntry>,
        /// Key of the first entry marked selected.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_key: Option<String>,
    },
}

impl Default for RenderedResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl RenderedResult {
    /// The empty sequence every failed evaluation degrades to.
    #[must_use]
    pub fn empty() -> Self {
        Self::Sequence {
            choices: Vec::new(),
        }
    }

    /// Normalize a raw script value.
    ///
    /// Arrays become sequences, objects become mappings, `null` becomes the
    /// empty sequence and any other scalar a one-element sequence.
    #[must_use]
    pub fn from_raw(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Self::empty(),
            serde_json::Value::Array(items) => Self::Sequence {
                choices: items.into_iter().map(Choice::from_raw).collect(),
            },
            serde_json::Value::Object(members) => {
                let entries: Vec<MappingEntry> = members
                    .iter()
                    .map(|(key, value)| MappingEntry::from_raw(key, value))
                    .collect();
                let default_key = entries
                    .iter()
                    .find(|entry| entry.selected)
                    .map(|entry| entry.key.clone());
                Self::Mapping {
                    entries,
                    default_key,
                }
            }
            scalar => Self::Sequence {
                choices: vec![Choice::from_raw(scalar)],
            },
        }
    }

    /// Number of values or entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence { choices } => choices.len(),
            Self::Mapping { entries, .. } => entries.len(),
        }
    }

    /// Whether nothing was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(key, label)` pairs as offered to the user.
    ///
    /// For a sequence the key and the label are both the displayed value,
    /// so a list and a mapping whose labels equal their keys render alike.
    #[must_use]
    pub fn choices(&self) -> Vec<(String, String)> {
        match self {
            Self::Sequence { choices } => choices
                .iter()
                .map(|choice| {
                    let label = choice.label();
                    (label.clone(), label)
                })
                .collect(),
            Self::Mapping { entries, .. } => entries
                .iter()
                .map(|entry| (entry.key.clone(), entry.label.clone()))
                .collect(),
        }
    }

    /// The choices as `{key=label, ...}`, for logs and diagnostics.
    #[must_use]
    pub fn choices_as_string(&self) -> String {
        let pairs: Vec<String> = self
            .choices()
            .into_iter()
            .map(|(key, label)| format!("{key}={label}"))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    /// The value a dependent parameter sees.
    ///
    /// The first selected value wins, otherwise the first value that is not
    /// disabled. For a mapping the key is the value.
    #[must_use]
    pub fn default_value(&self) -> Option<serde_json::Value> {
        match self {
            Self::Sequence { choices } => choices
                .iter()
                .find(|choice| choice.selected)
                .or_else(|| choices.iter().find(|choice| !choice.disabled))
                .map(|choice| choice.value.clone()),
            Self::Mapping {
                entries,
                default_key,
            } => default_key
                .clone()
                .or_else(|| {
                    entries
                        .iter()
                        .find(|entry| !entry.disabled)
                        .map(|entry| entry.key.clone())
                })
                .map(serde_json::Value::String),
        }
    }

    /// Minimal HTML for a dynamic reference.
    ///
    /// Lists become `<ol>`/`<ul>` items, a text box an `<input>` holding the
    /// default value, and formatted HTML is the labels concatenated
    /// unescaped. Unless `omit_value_field` is set, formatted HTML is
    /// followed by a hidden `value` input carrying the same text.
    #[must_use]
    pub fn to_html_fragment(&self, render: DynamicRenderType, omit_value_field: bool) -> String {
        let labels: Vec<String> = self.choices().into_iter().map(|(_, label)| label).collect();
        match render {
            DynamicRenderType::OrderedList => list_html("ol", &labels),
            DynamicRenderType::UnorderedList => list_html("ul", &labels),
            DynamicRenderType::TextBox => {
                let value = self
                    .default_value()
                    .map(|value| display_value(&value))
                    .unwrap_or_default();
                format!(
                    "<input type=\"text\" class=\"setting-input\" name=\"value\" value=\"{}\"/>",
                    escape_html(&value)
                )
            }
            DynamicRenderType::FormattedHtml | DynamicRenderType::FormattedHiddenHtml => {
                let html = labels.concat();
                if omit_value_field {
                    html
                } else {
                    format!(
                        "{html}<input type=\"hidden\" name=\"value\" value=\"{}\"/>",
                        escape_html(&html)
                    )
                }
            }
        }
    }
}

fn list_html(tag: &str, labels: &[String]) -> String {
    let items: String = labels
        .iter()
        .map(|label| format!("<li>{}</li>", escape_html(label)))
        .collect();
    format!("<{tag}>{items}</{tag}>")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
