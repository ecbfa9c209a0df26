use formtree_instance::DataElementIdentifier;
use formtree_layout::Component;
use serde::Serialize;

/// One occurrence of a component against a specific instance.
///
/// Identity is `(component id, index path, data element)`; the same static
/// component yields many contexts when it sits inside repeating groups or
/// sub-forms. Contexts borrow their [`Component`] from the layout model and
/// are never mutated after the builder returns them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentContext<'a> {
    component: &'a Component,
    index_path: Vec<usize>,
    row_count: Option<usize>,
    data_element: DataElementIdentifier,
    children: Vec<ComponentContext<'a>>,
}

impl<'a> ComponentContext<'a> {
    pub fn new(
        component: &'a Component,
        index_path: Vec<usize>,
        row_count: Option<usize>,
        data_element: DataElementIdentifier,
        children: Vec<ComponentContext<'a>>,
    ) -> Self {
        Self {
            component,
            index_path,
            row_count,
            data_element,
            children,
        }
    }

    pub fn component(&self) -> &'a Component {
        self.component
    }

    pub fn id(&self) -> &'a str {
        &self.component.id
    }

    /// Row of every enclosing repeating group, outermost first
    pub fn index_path(&self) -> &[usize] {
        &self.index_path
    }

    /// Rows iterated; only set on repeating groups whose collection resolved
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    pub fn data_element(&self) -> &DataElementIdentifier {
        &self.data_element
    }

    pub fn children(&self) -> &[ComponentContext<'a>] {
        &self.children
    }

    /// Children of a repeating group, grouped per row.
    ///
    /// Empty for anything that is not a repeating group.
    pub fn rows(&self) -> impl Iterator<Item = &[ComponentContext<'a>]> {
        let per_row = if self.component.is_repeating() {
            self.component.child_ids().len()
        } else {
            0
        };
        let children: &[ComponentContext<'a>] = if per_row == 0 { &[] } else { &self.children };
        children.chunks(per_row.max(1))
    }

    /// This context and everything below it, pre-order
    pub fn descendants(&self) -> Descendants<'_, 'a> {
        Descendants { stack: vec![self] }
    }

    /// First occurrence of `component_id` at exactly `index_path`
    pub fn find(&self, component_id: &str, index_path: &[usize]) -> Option<&ComponentContext<'a>> {
        self.descendants()
            .find(|ctx| ctx.id() == component_id && ctx.index_path == index_path)
    }

    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            id: self.component.id.clone(),
            component_type: self.component.component_type.clone(),
            index_path: self.index_path.clone(),
            row_count: self.row_count,
            data_element: self.data_element.clone(),
            children: self.children.iter().map(ComponentContext::summary).collect(),
        }
    }
}

/// Iterator returned by [`ComponentContext::descendants`]
pub struct Descendants<'c, 'a> {
    stack: Vec<&'c ComponentContext<'a>>,
}

impl<'c, 'a> Iterator for Descendants<'c, 'a> {
    type Item = &'c ComponentContext<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Owned, serializable view of a context tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub index_path: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    pub data_element: DataElementIdentifier,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContextSummary>,
}
