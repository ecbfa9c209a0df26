use crate::data::{DataElement, DataElementIdentifier};
use crate::error::{InstanceError, InstanceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The process element (task) an instance currently sits in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessElementInfo {
    pub element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<ProcessElementInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended: Option<DateTime<Utc>>,
}

/// Read-only instance view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessState>,
    #[serde(default)]
    pub data: Vec<DataElement>,
}

impl Instance {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> InstanceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.process = Some(ProcessState {
            current_task: Some(ProcessElementInfo {
                element_id: task_id.into(),
                name: None,
                started: None,
            }),
            started: None,
            ended: None,
        });
        self
    }

    pub fn with_data_element(mut self, element: DataElement) -> Self {
        self.data.push(element);
        self
    }

    /// Id of the task the process currently sits in, if any
    pub fn current_task(&self) -> Option<&str> {
        self.process
            .as_ref()
            .and_then(|p| p.current_task.as_ref())
            .map(|t| t.element_id.as_str())
    }

    /// Like [`Instance::current_task`], but a missing process is an error
    pub fn require_current_task(&self) -> InstanceResult<&str> {
        self.current_task()
            .ok_or_else(|| InstanceError::ProcessNotStarted {
                instance_id: self.id.clone(),
            })
    }

    pub fn is_ended(&self) -> bool {
        self.process.as_ref().is_some_and(|p| p.ended.is_some())
    }

    /// Data elements of the given type, in instance order
    pub fn data_elements_of_type<'a>(
        &'a self,
        data_type: &'a str,
    ) -> impl Iterator<Item = &'a DataElement> + 'a {
        self.data.iter().filter(move |d| d.data_type == data_type)
    }

    /// First data element of the given type
    pub fn first_data_element_of_type(&self, data_type: &str) -> Option<DataElementIdentifier> {
        self.data_elements_of_type(data_type)
            .next()
            .map(DataElement::identifier)
    }
}
