use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum allowed length for a [`ParameterName`].
const PARAMETER_NAME_MAX_LEN: usize = 255;

/// Errors from constructing a [`ParameterName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterNameError {
    /// The input was empty or contained only whitespace.
    #[error("parameter name cannot be empty or whitespace")]
    Empty,
    /// The name contains a comma, which separates referenced names in
    /// persisted configurations.
    #[error("parameter name cannot contain ','")]
    Comma,
    /// The trimmed name exceeds [`PARAMETER_NAME_MAX_LEN`] characters.
    #[error("parameter name exceeds maximum length of {PARAMETER_NAME_MAX_LEN} characters")]
    TooLong,
}

/// The name of a parameter, unique within its job.
///
/// Surrounding whitespace is trimmed; case and inner characters are kept
/// verbatim because scripts bind values under exactly this name.
///
/// # Examples
///
/// ```
/// use cascade_core::ParameterName;
///
/// let name: ParameterName = "  my-parameter-name ".parse().unwrap();
/// assert_eq!(name.as_str(), "my-parameter-name");
/// assert!("".parse::<ParameterName>().is_err());
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParameterName(String);

impl ParameterName {
    /// Create a new `ParameterName`, trimming and validating the input.
    pub fn new(raw: &str) -> Result<Self, ParameterNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParameterNameError::Empty);
        }
        if trimmed.contains(',') {
            return Err(ParameterNameError::Comma);
        }
        if trimmed.chars().count() > PARAMETER_NAME_MAX_LEN {
            return Err(ParameterNameError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Parse a comma-separated list of names, skipping empty segments.
    ///
    /// This is the legacy persisted form of a cascading parameter's
    /// referenced names (`"param001, param002"`).
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, ParameterNameError> {
        raw.split(',')
            .filter(|segment| !segment.trim().is_empty())
            .map(Self::new)
            .collect()
    }

    /// Return the inner string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ParameterName {
    type Err = ParameterNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ParameterName {
    type Error = ParameterNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ParameterName {
    type Error = ParameterNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ParameterName> for String {
    fn from(name: ParameterName) -> Self {
        name.0
    }
}

impl AsRef<str> for ParameterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ParameterName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ParameterName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ParameterName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for ParameterName {
    fn eq(&self, other: &String) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trims_surrounding_whitespace() {
        let name: ParameterName = "  param001  ".parse().unwrap();
        assert_eq!(name.as_str(), "param001");
    }

    #[test]
    fn keeps_case_and_hyphens() {
        let name: ParameterName = "My-Parameter_Name".parse().unwrap();
        assert_eq!(name.as_str(), "My-Parameter_Name");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ParameterName::new(""), Err(ParameterNameError::Empty));
        assert_eq!(ParameterName::new("   "), Err(ParameterNameError::Empty));
    }

    #[test]
    fn rejects_comma() {
        assert_eq!(ParameterName::new("a,b"), Err(ParameterNameError::Comma));
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(256);
        assert_eq!(ParameterName::new(&long), Err(ParameterNameError::TooLong));
        assert!(ParameterName::new(&"a".repeat(255)).is_ok());
    }

    #[test]
    fn parse_list_splits_and_trims() {
        let names = ParameterName::parse_list(" param001, param002 ,,").unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], "param001");
        assert_eq!(names[1], "param002");
    }

    #[test]
    fn parse_list_of_blank_is_empty() {
        assert!(ParameterName::parse_list("  ").unwrap().is_empty());
    }

    #[test]
    fn display_and_equality() {
        let name: ParameterName = "region".parse().unwrap();
        assert_eq!(name.to_string(), "region");
        assert_eq!(name, "region");
        assert_eq!(name, "region".to_string());
    }

    #[test]
    fn serde_roundtrip() {
        let name: ParameterName = "param001".parse().unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"param001\"");

        let back: ParameterName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn serde_rejects_empty() {
        let result: Result<ParameterName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
