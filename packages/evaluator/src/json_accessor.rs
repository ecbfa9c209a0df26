//! In-memory [`DataAccessor`] over JSON form data.
//!
//! Binding paths are dot separated (`people.addresses.street`). Every
//! collection met along the way consumes one position of the index path,
//! outermost first; a segment written with an explicit index
//! (`people[0].addresses`) uses that index instead. The final segment of a
//! length lookup is left unindexed.

use crate::accessor::DataAccessor;
use crate::error::DataAccessError;
use formtree_instance::{DataElement, DataElementIdentifier};
use formtree_layout::ModelBinding;
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment<'b> {
    name: &'b str,
    index: Option<usize>,
}

fn invalid(binding: &str, reason: &str) -> DataAccessError {
    DataAccessError::InvalidBinding {
        binding: binding.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_binding(field: &str) -> Result<Vec<Segment<'_>>, DataAccessError> {
    field
        .split('.')
        .map(|part| {
            let (name, index) = match part.split_once('[') {
                Some((name, rest)) => {
                    let digits = rest
                        .strip_suffix(']')
                        .ok_or_else(|| invalid(field, "unterminated index"))?;
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| invalid(field, "index is not a non-negative integer"))?;
                    (name, Some(index))
                }
                None => (part, None),
            };
            if name.is_empty() {
                return Err(invalid(field, "empty path segment"));
            }
            Ok(Segment { name, index })
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct JsonDataAccessor {
    data: HashMap<DataElementIdentifier, Value>,
    // insertion order, for bindings pinned to another data type
    types: Vec<(DataElementIdentifier, String)>,
}

impl JsonDataAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: &DataElement, value: Value) {
        let id = element.identifier();
        if self.data.insert(id.clone(), value).is_none() {
            self.types.push((id, element.data_type.clone()));
        }
    }

    pub fn with_element(mut self, element: &DataElement, value: Value) -> Self {
        self.insert(element, value);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn element_for(
        &self,
        binding: &ModelBinding,
        data_element: &DataElementIdentifier,
    ) -> Result<&Value, DataAccessError> {
        let id = match &binding.data_type {
            Some(data_type) => self
                .types
                .iter()
                .find(|(_, t)| t == data_type)
                .map(|(id, _)| id)
                .ok_or_else(|| DataAccessError::NoDataElementOfType {
                    data_type: data_type.clone(),
                })?,
            None => data_element,
        };
        self.data
            .get(id)
            .ok_or_else(|| DataAccessError::UnknownDataElement { id: id.to_string() })
    }

    /// Walk `binding` down to the value it names
    fn resolve(
        &self,
        binding: &ModelBinding,
        data_element: &DataElementIdentifier,
        index_path: &[usize],
    ) -> Result<Option<&Value>, DataAccessError> {
        let segments = parse_binding(&binding.field)?;
        let mut current = self.element_for(binding, data_element)?;
        let mut indexes = index_path.iter().copied();

        for (position, segment) in segments.iter().enumerate() {
            let is_last = position + 1 == segments.len();
            current = match current.get(segment.name) {
                Some(value) => value,
                None => return Ok(None),
            };

            match current {
                Value::Array(items) => {
                    // explicit indexes do not consume the index path
                    let row = if is_last {
                        segment.index
                    } else {
                        segment.index.or_else(|| indexes.next())
                    };
                    match row {
                        Some(row) => match items.get(row) {
                            Some(item) => current = item,
                            None => return Ok(None),
                        },
                        None if is_last => {}
                        None => return Ok(None),
                    }
                }
                _ if segment.index.is_some() => return Ok(None),
                _ => {}
            }
        }

        Ok(Some(current))
    }

    pub fn collection_length(
        &self,
        binding: &ModelBinding,
        data_element: &DataElementIdentifier,
        index_path: &[usize],
    ) -> Result<Option<usize>, DataAccessError> {
        let length = self
            .resolve(binding, data_element, index_path)?
            .and_then(Value::as_array)
            .map(Vec::len);
        trace!(binding = %binding, data_element = %data_element, ?index_path, ?length, "Resolved collection length");
        Ok(length)
    }

    pub fn value(
        &self,
        binding: &ModelBinding,
        data_element: &DataElementIdentifier,
        index_path: &[usize],
    ) -> Result<Option<Value>, DataAccessError> {
        Ok(self
            .resolve(binding, data_element, index_path)?
            .filter(|value| !value.is_null())
            .cloned())
    }
}

impl DataAccessor for JsonDataAccessor {
    fn get_collection_length<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<usize>, DataAccessError>> {
        future::ready(self.collection_length(binding, data_element, index_path)).boxed()
    }

    fn get_value<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<Value>, DataAccessError>> {
        future::ready(self.value(binding, data_element, index_path)).boxed()
    }
}
