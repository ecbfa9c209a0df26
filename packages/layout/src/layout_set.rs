use crate::component::Component;
use crate::error::{LayoutError, LayoutResult};
use crate::page::Page;
use formtree_instance::{DataElementIdentifier, DataType, Instance};
use std::collections::HashMap;

/// A named, ordered collection of pages bound to one default data type
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSet {
    id: String,
    default_data_type: DataType,
    tasks: Vec<String>,
    pages: Vec<Page>,
    page_lookup: HashMap<String, usize>,
}

impl LayoutSet {
    /// Fails for an empty page list or a page name used twice
    pub fn new(id: impl Into<String>, default_data_type: DataType, pages: Vec<Page>) -> LayoutResult<Self> {
        let id = id.into();
        if pages.is_empty() {
            return Err(LayoutError::EmptyLayoutSet { id });
        }

        let mut page_lookup = HashMap::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            if page_lookup.insert(page.id().to_string(), index).is_some() {
                return Err(LayoutError::DuplicatePage {
                    layout_set: id,
                    page: page.id().to_string(),
                });
            }
        }

        Ok(Self {
            id,
            default_data_type,
            tasks: Vec::new(),
            pages,
            page_lookup,
        })
    }

    /// Process tasks this layout-set renders
    pub fn with_tasks(mut self, tasks: Vec<String>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn default_data_type(&self) -> &DataType {
        &self.default_data_type
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn handles_task(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|t| t == task_id)
    }

    /// Pages in declared order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn get_page(&self, page_name: &str) -> LayoutResult<&Page> {
        self.page_lookup
            .get(page_name)
            .map(|&index| &self.pages[index])
            .ok_or_else(|| LayoutError::UnknownPage {
                layout_set: self.id.clone(),
                page: page_name.to_string(),
            })
    }

    pub fn get_component(&self, page_name: &str, component_id: &str) -> LayoutResult<&Component> {
        self.get_page(page_name)?.get_component(component_id)
    }

    /// First data element of the instance whose type matches this set's default
    /// data type. `None` just means the element has not been created yet.
    pub fn get_default_data_element_id(&self, instance: &Instance) -> Option<DataElementIdentifier> {
        instance.first_data_element_of_type(&self.default_data_type.id)
    }
}
