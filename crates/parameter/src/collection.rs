use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::def::ParameterDef;
use crate::error::ParameterError;

/// An ordered collection of parameter definitions, unique by name.
///
/// This is the persisted form of a job's parameters. A new configuration
/// version replaces the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterCollection {
    parameters: Vec<ParameterDef>,
}

impl ParameterCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicate names.
    pub fn try_from_defs(
        defs: impl IntoIterator<Item = ParameterDef>,
    ) -> Result<Self, ParameterError> {
        let mut collection = Self::new();
        for def in defs {
            collection.add(def)?;
        }
        Ok(collection)
    }

    /// Load a collection from JSON.
    ///
    /// Any malformed record fails the whole load.
    pub fn from_json(json: &str) -> Result<Self, ParameterError> {
        let loaded: Self = serde_json::from_str(json).map_err(ParameterError::load)?;
        loaded.check_unique()?;
        Ok(loaded)
    }

    /// Load a collection from a JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, ParameterError> {
        let loaded: Self = serde_json::from_reader(reader).map_err(ParameterError::load)?;
        loaded.check_unique()?;
        Ok(loaded)
    }

    /// Save the collection as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ParameterError> {
        serde_json::to_string_pretty(self).map_err(|e| ParameterError::Serialization {
            error: e.to_string(),
        })
    }

    fn check_unique(&self) -> Result<(), ParameterError> {
        let mut seen = HashSet::new();
        for def in &self.parameters {
            if !seen.insert(def.name().as_str()) {
                return Err(ParameterError::load(format!(
                    "duplicate parameter name `{}`",
                    def.name()
                )));
            }
        }
        Ok(())
    }

    /// Add a parameter definition.
    pub fn add(&mut self, param: ParameterDef) -> Result<&mut Self, ParameterError> {
        if self.contains(param.name().as_str()) {
            return Err(ParameterError::AlreadyExists {
                name: param.name().to_string(),
            });
        }
        self.parameters.push(param);
        Ok(self)
    }

    /// Get a parameter by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ParameterDef> {
        self.parameters.get(index)
    }

    /// Get a parameter by its name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&ParameterDef> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    /// Remove and return a parameter by name.
    pub fn remove(&mut self, name: &str) -> Result<ParameterDef, ParameterError> {
        let idx = self
            .parameters
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| ParameterError::NotFound {
                name: name.to_owned(),
            })?;
        Ok(self.parameters.remove(idx))
    }

    /// Check whether a parameter with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name() == name)
    }

    /// Iterate over all parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name().as_str())
    }

    /// The number of parameters in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterate over all parameter definitions.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDef> {
        self.parameters.iter()
    }

    /// The definitions in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[ParameterDef] {
        &self.parameters
    }
}

impl IntoIterator for ParameterCollection {
    type Item = ParameterDef;
    type IntoIter = std::vec::IntoIter<ParameterDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a ParameterDef;
    type IntoIter = std::slice::Iter<'a, ParameterDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

#[cfg(test)]
mod tests {
    use cascade_script::{ScriptRef, ScriptSource};

    use super::*;
    use crate::types::ChoiceParameter;

    fn choice(name: &str) -> ParameterDef {
        ParameterDef::Choice(ChoiceParameter::new(
            name.parse().unwrap(),
            ScriptRef::inline(ScriptSource::new("[]", false), ScriptSource::empty()),
        ))
    }

    #[test]
    fn new_is_empty() {
        let col = ParameterCollection::new();
        assert!(col.is_empty());
        assert_eq!(col.len(), 0);
    }

    #[test]
    fn add_and_get_by_name() {
        let mut col = ParameterCollection::new();
        col.add(choice("a")).unwrap().add(choice("b")).unwrap();
        assert_eq!(col.len(), 2);
        assert_eq!(col.get_by_name("b").unwrap().name(), "b");
        assert_eq!(col.get(0).unwrap().name(), "a");
        assert!(col.get_by_name("missing").is_none());
        assert_eq!(col.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn add_rejects_duplicate() {
        let mut col = ParameterCollection::new();
        col.add(choice("a")).unwrap();
        let err = col.add(choice("a")).unwrap_err();
        assert_eq!(err, ParameterError::AlreadyExists { name: "a".into() });
    }

    #[test]
    fn remove() {
        let mut col = ParameterCollection::try_from_defs([choice("a"), choice("b")]).unwrap();
        assert_eq!(col.remove("a").unwrap().name(), "a");
        assert!(!col.contains("a"));
        assert!(matches!(col.remove("a"), Err(ParameterError::NotFound { .. })));
    }

    #[test]
    fn load_rejects_duplicate_names() {
        let col = ParameterCollection::try_from_defs([choice("a")]).unwrap();
        let json = col.to_json_pretty().unwrap();
        assert!(ParameterCollection::from_json(&json).is_ok());

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = value["parameters"][0].clone();
        value["parameters"].as_array_mut().unwrap().push(first);
        let err = ParameterCollection::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, ParameterError::Load { .. }));
    }
}
