//! The three parameter kinds.

pub mod cascade;
pub mod choice;
pub mod dynamic;

pub use cascade::CascadeChoiceParameter;
pub use choice::ChoiceParameter;
pub use dynamic::DynamicReferenceParameter;

/// Serde helpers for `referenced_parameters`.
///
/// Stored as a list of names. Older configurations stored one
/// comma-separated string, which is still accepted on load.
pub(crate) mod referenced {
    use cascade_core::ParameterName;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        List(Vec<ParameterName>),
        Legacy(String),
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ParameterName>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Stored::deserialize(deserializer)? {
            Stored::List(names) => Ok(names),
            Stored::Legacy(raw) => ParameterName::parse_list(&raw).map_err(serde::de::Error::custom),
        }
    }
}
