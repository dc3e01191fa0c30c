//! How the host presents a parameter.
//!
//! Choice parameters and dynamic references accept disjoint sets of render
//! types, so each family stores its own enum and a definition can never
//! hold a render type it does not support. [`RenderType`] is the union
//! used when the family does not matter.

use serde::{Deserialize, Serialize};

/// Render types for choice and cascade choice parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceRenderType {
    /// Drop-down with one selection.
    #[default]
    #[serde(alias = "PT_SINGLE_SELECT")]
    SingleSelect,
    /// List with any number of selections.
    #[serde(alias = "PT_MULTI_SELECT")]
    MultiSelect,
    /// One checkbox per choice.
    #[serde(alias = "PT_CHECKBOX")]
    Checkbox,
    /// One radio button per choice.
    #[serde(alias = "PT_RADIO")]
    Radio,
}

impl ChoiceRenderType {
    /// Whether the user may select more than one value.
    #[must_use]
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::MultiSelect | Self::Checkbox)
    }
}

/// Render types for dynamic reference parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicRenderType {
    /// Script output inserted as HTML.
    #[default]
    #[serde(alias = "ET_FORMATTED_HTML")]
    FormattedHtml,
    /// Script output inserted as HTML, hidden from the form.
    #[serde(alias = "ET_FORMATTED_HIDDEN_HTML")]
    FormattedHiddenHtml,
    /// A single-line text input prefilled with the output.
    #[serde(alias = "ET_TEXT_BOX")]
    TextBox,
    /// Output as a numbered list.
    #[serde(alias = "ET_ORDERED_LIST")]
    OrderedList,
    /// Output as a bulleted list.
    #[serde(alias = "ET_UNORDERED_LIST")]
    UnorderedList,
}

/// Every render type a parameter may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderType {
    /// See [`ChoiceRenderType::SingleSelect`].
    SingleSelect,
    /// See [`ChoiceRenderType::MultiSelect`].
    MultiSelect,
    /// See [`ChoiceRenderType::Checkbox`].
    Checkbox,
    /// See [`ChoiceRenderType::Radio`].
    Radio,
    /// See [`DynamicRenderType::FormattedHtml`].
    FormattedHtml,
    /// See [`DynamicRenderType::FormattedHiddenHtml`].
    FormattedHiddenHtml,
    /// See [`DynamicRenderType::TextBox`].
    TextBox,
    /// See [`DynamicRenderType::OrderedList`].
    OrderedList,
    /// See [`DynamicRenderType::UnorderedList`].
    UnorderedList,
}

impl RenderType {
    /// The choice render type, if this is one.
    #[must_use]
    pub fn as_choice(&self) -> Option<ChoiceRenderType> {
        match self {
            Self::SingleSelect => Some(ChoiceRenderType::SingleSelect),
            Self::MultiSelect => Some(ChoiceRenderType::MultiSelect),
            Self::Checkbox => Some(ChoiceRenderType::Checkbox),
            Self::Radio => Some(ChoiceRenderType::Radio),
            _ => None,
        }
    }

    /// The dynamic render type, if this is one.
    #[must_use]
    pub fn as_dynamic(&self) -> Option<DynamicRenderType> {
        match self {
            Self::FormattedHtml => Some(DynamicRenderType::FormattedHtml),
            Self::FormattedHiddenHtml => Some(DynamicRenderType::FormattedHiddenHtml),
            Self::TextBox => Some(DynamicRenderType::TextBox),
            Self::OrderedList => Some(DynamicRenderType::OrderedList),
            Self::UnorderedList => Some(DynamicRenderType::UnorderedList),
            _ => None,
        }
    }
}

impl From<ChoiceRenderType> for RenderType {
    fn from(render: ChoiceRenderType) -> Self {
        match render {
            ChoiceRenderType::SingleSelect => Self::SingleSelect,
            ChoiceRenderType::MultiSelect => Self::MultiSelect,
            ChoiceRenderType::Checkbox => Self::Checkbox,
            ChoiceRenderType::Radio => Self::Radio,
        }
    }
}

impl From<DynamicRenderType> for RenderType {
    fn from(render: DynamicRenderType) -> Self {
        match render {
            DynamicRenderType::FormattedHtml => Self::FormattedHtml,
            DynamicRenderType::FormattedHiddenHtml => Self::FormattedHiddenHtml,
            DynamicRenderType::TextBox => Self::TextBox,
            DynamicRenderType::OrderedList => Self::OrderedList,
            DynamicRenderType::UnorderedList => Self::UnorderedList,
        }
    }
}
