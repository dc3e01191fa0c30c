use serde::{Deserialize, Serialize};

const SELECTED_MARKER: &str = ":selected";
const DISABLED_MARKER: &str = ":disabled";

/// One value of a sequence result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The value, with any markers stripped.
    pub value: serde_json::Value,

    /// Whether the value is selected by default.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,

    /// Whether the value is shown but not selectable.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl Choice {
    /// A plain choice.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value,
            selected: false,
            disabled: false,
        }
    }

    /// Build a choice from a script value, honouring string markers.
    #[must_use]
    pub fn from_raw(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => {
                let marked = Marked::parse(&text);
                Self {
                    value: serde_json::Value::String(marked.text.to_owned()),
                    selected: marked.selected,
                    disabled: marked.disabled,
                }
            }
            other => Self::new(other),
        }
    }

    /// The value as shown to a user.
    #[must_use]
    pub fn label(&self) -> String {
        display_value(&self.value)
    }
}

/// One entry of a mapping result: the submitted key and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Value submitted when the entry is chosen.
    pub key: String,

    /// Text shown to the user.
    pub label: String,

    /// Whether the entry is selected by default.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,

    /// Whether the entry is shown but not selectable.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl MappingEntry {
    /// A plain entry.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            selected: false,
            disabled: false,
        }
    }

    /// Build an entry from an object member of a script result.
    ///
    /// Markers may sit on either side; both are stripped and their flags
    /// combined.
    #[must_use]
    pub fn from_raw(key: &str, value: &serde_json::Value) -> Self {
        let key = Marked::parse(key);
        let label_text = display_value(value);
        let label = Marked::parse(&label_text);
        Self {
            key: key.text.to_owned(),
            label: label.text.to_owned(),
            selected: key.selected || label.selected,
            disabled: key.disabled || label.disabled,
        }
    }
}

/// Text with its `:selected` / `:disabled` suffixes split off.
struct Marked<'a> {
    text: &'a str,
    selected: bool,
    disabled: bool,
}

impl<'a> Marked<'a> {
    fn parse(raw: &'a str) -> Self {
        let mut marked = Self {
            text: raw,
            selected: false,
            disabled: false,
        };
        loop {
            if let Some(rest) = marked.text.strip_suffix(SELECTED_MARKER) {
                marked.text = rest;
                marked.selected = true;
            } else if let Some(rest) = marked.text.strip_suffix(DISABLED_MARKER) {
                marked.text = rest;
                marked.disabled = true;
            } else {
                return marked;
            }
        }
    }
}

/// Render a JSON value for display: strings verbatim, everything else as
/// compact JSON.
#[must_use]
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("a", "a", false, false)]
    #[case("a:selected", "a", true, false)]
    #[case("a:disabled", "a", false, true)]
    #[case("a:selected:disabled", "a", true, true)]
    #[case("a:disabled:selected", "a", true, true)]
    #[case("key:value", "key:value", false, false)]
    fn markers(
        #[case] raw: &str,
        #[case] text: &str,
        #[case] selected: bool,
        #[case] disabled: bool,
    ) {
        let choice = Choice::from_raw(json!(raw));
        assert_eq!(choice.value, json!(text));
        assert_eq!(choice.selected, selected);
        assert_eq!(choice.disabled, disabled);
    }

    #[test]
    fn non_string_values_keep_their_type() {
        let choice = Choice::from_raw(json!(7));
        assert_eq!(choice.value, json!(7));
        assert_eq!(choice.label(), "7");
    }

    #[test]
    fn mapping_entry_markers_on_either_side() {
        let entry = MappingEntry::from_raw("us-east-1:selected", &json!("US East:disabled"));
        assert_eq!(entry.key, "us-east-1");
        assert_eq!(entry.label, "US East");
        assert!(entry.selected);
        assert!(entry.disabled);
    }

    #[test]
    fn flags_are_omitted_when_false() {
        let json = serde_json::to_value(Choice::new(json!("a"))).unwrap();
        assert_eq!(json, json!({"value": "a"}));
    }
}
