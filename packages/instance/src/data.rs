use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one data element of an instance.
///
/// Two component occurrences that share an id but live under different data
/// elements (e.g. two sub-form rows) are told apart by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataElementIdentifier(String);

impl DataElementIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataElementIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataElementIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<&DataElement> for DataElementIdentifier {
    fn from(element: &DataElement) -> Self {
        element.identifier()
    }
}

/// A persisted unit of data within an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElement {
    pub id: String,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl DataElement {
    pub fn new(id: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_type: data_type.into(),
            content_type: None,
            locked: None,
        }
    }

    pub fn identifier(&self) -> DataElementIdentifier {
        DataElementIdentifier::new(self.id.clone())
    }
}

/// Data type declared in the application metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    pub id: String,
}

impl DataType {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_serializes_as_plain_string() {
        let id = DataElementIdentifier::new("3f2c");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3f2c\"");
        assert_eq!(id.to_string(), "3f2c");
    }

    #[test]
    fn test_data_element_from_json() {
        let json = r#"{ "id": "d1", "dataType": "model", "contentType": "application/xml" }"#;
        let element: DataElement = serde_json::from_str(json).unwrap();
        assert_eq!(element.data_type, "model");
        assert_eq!(element.identifier(), DataElementIdentifier::from("d1"));
        assert_eq!(element.locked, None);
    }

    #[test]
    fn test_data_type_ignores_unknown_metadata() {
        let json = r#"{ "id": "model", "appLogic": { "classRef": "App.Models.Model" } }"#;
        let data_type: DataType = serde_json::from_str(json).unwrap();
        assert_eq!(data_type, DataType::new("model"));
    }
}
