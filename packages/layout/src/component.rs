use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Binding name a repeating group uses for its collection
pub const GROUP_BINDING: &str = "group";

/// Index of a component inside its page's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Path into a data model, optionally pinned to a data type other than the
/// layout-set default.
///
/// Layout files write bindings either as a bare path string or as
/// `{ "field": "...", "dataType": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBinding")]
pub struct ModelBinding {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBinding {
    Path(String),
    Qualified {
        field: String,
        #[serde(default, rename = "dataType")]
        data_type: Option<String>,
    },
}

impl From<RawBinding> for ModelBinding {
    fn from(raw: RawBinding) -> Self {
        match raw {
            RawBinding::Path(field) => ModelBinding {
                field,
                data_type: None,
            },
            RawBinding::Qualified { field, data_type } => ModelBinding { field, data_type },
        }
    }
}

impl ModelBinding {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            data_type: None,
        }
    }
}

impl fmt::Display for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data_type {
            Some(data_type) => write!(f, "{}:{}", data_type, self.field),
            None => f.write_str(&self.field),
        }
    }
}

/// The closed set of component shapes the context builder understands.
///
/// Adding a variant forces every `match` in the builder to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    /// No children
    Leaf,
    /// Children share the parent's index path
    Group { children: Vec<NodeId> },
    /// Children are instantiated once per row of the `group` binding
    RepeatingGroup { children: Vec<NodeId> },
    /// Embeds every page of another layout-set, once per matching data element
    SubForm { layout_set_id: String },
}

/// Static component definition
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub page_id: String,
    /// Type name as written in the layout (`Input`, `Group`, `Subform`, ...)
    pub component_type: String,
    pub data_model_bindings: BTreeMap<String, ModelBinding>,
    /// Raw `hidden` expression, left for the expression layer
    pub hidden: Option<Value>,
    /// Raw `required` expression, left for the expression layer
    pub required: Option<Value>,
    /// Everything else the layout declares (text bindings, render options)
    pub properties: Map<String, Value>,
    pub kind: ComponentKind,
}

impl Component {
    /// A leaf with no bindings, mostly handy in tests
    pub fn leaf(id: impl Into<String>, page_id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page_id: page_id.into(),
            component_type: component_type.into(),
            data_model_bindings: BTreeMap::new(),
            hidden: None,
            required: None,
            properties: Map::new(),
            kind: ComponentKind::Leaf,
        }
    }

    pub fn binding(&self, name: &str) -> Option<&ModelBinding> {
        self.data_model_bindings.get(name)
    }

    /// The collection a repeating group iterates, if bound
    pub fn group_binding(&self) -> Option<&ModelBinding> {
        self.binding(GROUP_BINDING)
    }

    /// Arena ids of direct children (empty for leaves and sub-forms)
    pub fn child_ids(&self) -> &[NodeId] {
        match &self.kind {
            ComponentKind::Group { children } | ComponentKind::RepeatingGroup { children } => {
                children
            }
            ComponentKind::Leaf | ComponentKind::SubForm { .. } => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::Group { .. } | ComponentKind::RepeatingGroup { .. }
        )
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self.kind, ComponentKind::RepeatingGroup { .. })
    }

    pub fn sub_form_layout_set(&self) -> Option<&str> {
        match &self.kind {
            ComponentKind::SubForm { layout_set_id } => Some(layout_set_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_accepts_string_and_object() {
        let json = r#"{ "simpleBinding": "person.name", "group": { "field": "people", "dataType": "other" } }"#;
        let bindings: BTreeMap<String, ModelBinding> = serde_json::from_str(json).unwrap();

        assert_eq!(bindings["simpleBinding"], ModelBinding::new("person.name"));
        assert_eq!(bindings["group"].field, "people");
        assert_eq!(bindings["group"].data_type.as_deref(), Some("other"));
        assert_eq!(bindings["group"].to_string(), "other:people");
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = Component::leaf("field1", "page1", "Input");
        assert!(leaf.child_ids().is_empty());
        assert!(!leaf.is_group());
        assert_eq!(leaf.group_binding(), None);
        assert_eq!(leaf.sub_form_layout_set(), None);
    }

    #[test]
    fn test_repeating_group_exposes_group_binding() {
        let mut group = Component::leaf("rep", "page1", "RepeatingGroup");
        group
            .data_model_bindings
            .insert(GROUP_BINDING.to_string(), ModelBinding::new("people"));
        group.kind = ComponentKind::RepeatingGroup {
            children: vec![NodeId(2), NodeId(3)],
        };

        assert!(group.is_repeating());
        assert_eq!(group.child_ids(), &[NodeId(2), NodeId(3)]);
        assert_eq!(group.group_binding().map(|b| b.field.as_str()), Some("people"));
    }
}
