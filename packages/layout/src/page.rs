//! Page arena and component lookup index.
//!
//! Layout files list a page's components flat; groups point at their
//! children by id. [`Page::from_components`] resolves those references once,
//! stores every component in an arena, and keeps an id → [`NodeId`] map for
//! constant-time lookups.

use crate::component::{Component, ComponentKind, ModelBinding, NodeId};
use crate::error::{LayoutError, LayoutResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub const PAGE_COMPONENT_TYPE: &str = "Page";

/// One entry of a page file's `data.layout` list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub data_model_bindings: BTreeMap<String, ModelBinding>,
    #[serde(default)]
    pub children: Option<Vec<String>>,
    #[serde(default)]
    pub max_count: Option<u32>,
    #[serde(default)]
    pub layout_set: Option<String>,
    #[serde(default)]
    pub hidden: Option<Value>,
    #[serde(default)]
    pub required: Option<Value>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl RawComponent {
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            data_model_bindings: BTreeMap::new(),
            children: None,
            max_count: None,
            layout_set: None,
            hidden: None,
            required: None,
            properties: Map::new(),
        }
    }

    pub fn with_binding(mut self, name: &str, field: &str) -> Self {
        self.data_model_bindings
            .insert(name.to_string(), ModelBinding::new(field));
        self
    }

    pub fn with_children(mut self, children: &[&str]) -> Self {
        self.children = Some(children.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_layout_set(mut self, layout_set: &str) -> Self {
        self.layout_set = Some(layout_set.to_string());
        self
    }

    /// `RepeatingGroup`, or the legacy `Group` with `maxCount > 1`
    fn is_repeating(&self) -> bool {
        self.component_type == "RepeatingGroup"
            || (self.component_type == "Group" && self.max_count.is_some_and(|max| max > 1))
    }

    fn is_sub_form(&self) -> bool {
        self.component_type == "Subform"
    }
}

/// A page: component arena plus its lookup index
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    id: String,
    nodes: Vec<Component>,
    lookup: HashMap<String, NodeId>,
}

impl Page {
    const ROOT: NodeId = NodeId(0);

    /// Build a page from a flat component list.
    ///
    /// Components no group claims become top-level children of the page root,
    /// in declaration order.
    pub fn from_components(page_id: &str, raw: Vec<RawComponent>) -> LayoutResult<Self> {
        let mut lookup = HashMap::with_capacity(raw.len());

        for (offset, component) in raw.iter().enumerate() {
            if lookup
                .insert(component.id.clone(), NodeId(offset + 1))
                .is_some()
            {
                return Err(LayoutError::DuplicateComponent {
                    page: page_id.to_string(),
                    component_id: component.id.clone(),
                });
            }
        }

        // parent[i] = arena index of whoever claimed node i
        let mut parent: Vec<Option<NodeId>> = vec![None; raw.len() + 1];
        let mut kinds = Vec::with_capacity(raw.len());

        for (offset, component) in raw.iter().enumerate() {
            let node = NodeId(offset + 1);
            let kind = if component.is_sub_form() {
                if component.children.is_some() {
                    return Err(LayoutError::InvalidComponent {
                        page: page_id.to_string(),
                        component_id: component.id.clone(),
                        message: "a Subform cannot declare children".to_string(),
                    });
                }
                let layout_set_id = component.layout_set.clone().ok_or_else(|| {
                    LayoutError::MissingLayoutSetReference {
                        page: page_id.to_string(),
                        component_id: component.id.clone(),
                    }
                })?;
                ComponentKind::SubForm { layout_set_id }
            } else if let Some(child_names) = &component.children {
                let mut children = Vec::with_capacity(child_names.len());
                for child_name in child_names {
                    let child = *lookup.get(child_name).ok_or_else(|| LayoutError::UnknownChild {
                        page: page_id.to_string(),
                        parent: component.id.clone(),
                        child: child_name.clone(),
                    })?;
                    if let Some(first) = parent[child.0] {
                        return Err(LayoutError::ChildClaimedTwice {
                            page: page_id.to_string(),
                            child: child_name.clone(),
                            first_parent: raw[first.0 - 1].id.clone(),
                            second_parent: component.id.clone(),
                        });
                    }
                    parent[child.0] = Some(node);
                    children.push(child);
                }
                if component.is_repeating() {
                    ComponentKind::RepeatingGroup { children }
                } else {
                    ComponentKind::Group { children }
                }
            } else if component.is_repeating() {
                ComponentKind::RepeatingGroup { children: Vec::new() }
            } else {
                ComponentKind::Leaf
            };
            kinds.push(kind);
        }

        let top_level: Vec<NodeId> = (1..=raw.len())
            .filter(|&index| parent[index].is_none())
            .map(NodeId)
            .collect();

        let mut root = Component::leaf(page_id, page_id, PAGE_COMPONENT_TYPE);
        root.kind = ComponentKind::Group { children: top_level };

        let mut nodes = Vec::with_capacity(raw.len() + 1);
        nodes.push(root);
        for (component, kind) in raw.into_iter().zip(kinds) {
            nodes.push(Component {
                id: component.id,
                page_id: page_id.to_string(),
                component_type: component.component_type,
                data_model_bindings: component.data_model_bindings,
                hidden: component.hidden,
                required: component.required,
                properties: component.properties,
                kind,
            });
        }

        let page = Self {
            id: page_id.to_string(),
            nodes,
            lookup,
        };
        page.check_reachable()?;

        debug!(page = %page.id, components = page.nodes.len() - 1, "Built page");
        Ok(page)
    }

    /// Parse a page file (`{ "data": { "layout": [...] } }`)
    pub fn from_json(page_id: &str, json: &str) -> LayoutResult<Self> {
        #[derive(Deserialize)]
        struct PageFile {
            data: PageData,
        }

        #[derive(Deserialize)]
        struct PageData {
            #[serde(default)]
            layout: Vec<RawComponent>,
        }

        let file: PageFile = serde_json::from_str(json).map_err(|source| LayoutError::Json {
            path: page_id.to_string(),
            source,
        })?;
        Self::from_components(page_id, file.data.layout)
    }

    // Every claimed node has exactly one parent, so anything the root cannot
    // reach sits on a cycle.
    fn check_reachable(&self) -> LayoutResult<()> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![Self::ROOT];
        while let Some(node) = stack.pop() {
            if std::mem::replace(&mut seen[node.0], true) {
                continue;
            }
            stack.extend(self.nodes[node.0].child_ids().iter().copied());
        }

        match seen.iter().position(|visited| !visited) {
            Some(index) => Err(LayoutError::UnreachableComponent {
                page: self.id.clone(),
                component_id: self.nodes[index].id.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The synthetic `Page` group holding the top-level components
    pub fn root(&self) -> &Component {
        &self.nodes[Self::ROOT.0]
    }

    pub fn node(&self, id: NodeId) -> &Component {
        &self.nodes[id.0]
    }

    pub fn children<'a>(&'a self, component: &'a Component) -> impl Iterator<Item = &'a Component> + 'a {
        component.child_ids().iter().map(move |&id| self.node(id))
    }

    /// Constant-time lookup by component id. The page root is not indexed.
    pub fn component(&self, component_id: &str) -> Option<&Component> {
        self.lookup.get(component_id).map(|&id| self.node(id))
    }

    pub fn get_component(&self, component_id: &str) -> LayoutResult<&Component> {
        self.component(component_id)
            .ok_or_else(|| LayoutError::ComponentNotFound {
                page: self.id.clone(),
                component_id: component_id.to_string(),
            })
    }

    /// All components in arena (declaration) order, page root first
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.nodes.iter()
    }

    /// Number of declared components, not counting the page root
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(page: &'a Page, component: &'a Component) -> Vec<&'a str> {
        page.children(component).map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_top_level_order_and_nesting() {
        let page = Page::from_components(
            "page1",
            vec![
                RawComponent::new("title", "Header"),
                RawComponent::new("group", "Group").with_children(&["a", "b"]),
                RawComponent::new("a", "Input").with_binding("simpleBinding", "x.a"),
                RawComponent::new("b", "Input"),
                RawComponent::new("footer", "Paragraph"),
            ],
        )
        .expect("Failed to build page");

        assert_eq!(page.len(), 5);
        assert_eq!(page.root().component_type, PAGE_COMPONENT_TYPE);
        assert_eq!(ids(&page, page.root()), vec!["title", "group", "footer"]);

        let group = page.get_component("group").unwrap();
        assert!(matches!(group.kind, ComponentKind::Group { .. }));
        assert_eq!(ids(&page, group), vec!["a", "b"]);
        assert_eq!(page.get_component("a").unwrap().page_id, "page1");
    }

    #[test]
    fn test_repeating_group_detection() {
        let page = Page::from_components(
            "page1",
            vec![
                RawComponent::new("modern", "RepeatingGroup")
                    .with_binding("group", "people")
                    .with_children(&["name"]),
                RawComponent::new("name", "Input"),
                RawComponent {
                    max_count: Some(5),
                    ..RawComponent::new("legacy", "Group").with_children(&["age"])
                },
                RawComponent::new("age", "Input"),
                RawComponent {
                    max_count: Some(1),
                    ..RawComponent::new("single", "Group").with_children(&[])
                },
            ],
        )
        .unwrap();

        assert!(page.get_component("modern").unwrap().is_repeating());
        assert!(page.get_component("legacy").unwrap().is_repeating());
        assert!(!page.get_component("single").unwrap().is_repeating());
        assert!(page.get_component("single").unwrap().is_group());
    }

    #[test]
    fn test_unknown_component_lookup_fails() {
        let page = Page::from_components("page1", vec![RawComponent::new("a", "Input")]).unwrap();
        assert!(page.component("a").is_some());
        assert!(matches!(
            page.get_component("missing"),
            Err(LayoutError::ComponentNotFound { .. })
        ));
        assert!(page.get_component("page1").is_err());
    }

    #[test]
    fn test_component_may_share_the_page_name() {
        let page = Page::from_components(
            "people",
            vec![
                RawComponent::new("people", "RepeatingGroup")
                    .with_binding("group", "people")
                    .with_children(&["name"]),
                RawComponent::new("name", "Input"),
            ],
        )
        .unwrap();

        let group = page.get_component("people").unwrap();
        assert!(group.is_repeating());
        assert_eq!(page.root().component_type, PAGE_COMPONENT_TYPE);
        assert_eq!(ids(&page, page.root()), vec!["people"]);
        assert_eq!(ids(&page, group), vec!["name"]);
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let err = Page::from_components(
            "page1",
            vec![RawComponent::new("a", "Input"), RawComponent::new("a", "Input")],
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateComponent { component_id, .. } if component_id == "a"));
    }

    #[test]
    fn test_unknown_child_rejected() {
        let err = Page::from_components(
            "page1",
            vec![RawComponent::new("g", "Group").with_children(&["ghost"])],
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownChild { child, .. } if child == "ghost"));
    }

    #[test]
    fn test_child_claimed_twice_rejected() {
        let err = Page::from_components(
            "page1",
            vec![
                RawComponent::new("g1", "Group").with_children(&["a"]),
                RawComponent::new("g2", "Group").with_children(&["a"]),
                RawComponent::new("a", "Input"),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::ChildClaimedTwice { first_parent, second_parent, .. }
                if first_parent == "g1" && second_parent == "g2"
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = Page::from_components(
            "page1",
            vec![
                RawComponent::new("g1", "Group").with_children(&["g2"]),
                RawComponent::new("g2", "Group").with_children(&["g1"]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::UnreachableComponent { .. }));
    }

    #[test]
    fn test_sub_form_requires_layout_set() {
        let err = Page::from_components("page1", vec![RawComponent::new("sub", "Subform")]).unwrap_err();
        assert!(matches!(err, LayoutError::MissingLayoutSetReference { .. }));

        let page = Page::from_components(
            "page1",
            vec![RawComponent::new("sub", "Subform").with_layout_set("vehicles")],
        )
        .unwrap();
        assert_eq!(
            page.get_component("sub").unwrap().sub_form_layout_set(),
            Some("vehicles")
        );
    }

    #[test]
    fn test_from_json_keeps_extra_properties() {
        let json = r#"{
            "$schema": "https://example.org/layout.schema.v1.json",
            "data": {
                "layout": [
                    {
                        "id": "name",
                        "type": "Input",
                        "dataModelBindings": { "simpleBinding": "person.name" },
                        "textResourceBindings": { "title": "name.title" },
                        "required": true,
                        "hidden": ["equals", ["dataModel", "person.age"], 0]
                    }
                ]
            }
        }"#;

        let page = Page::from_json("page1", json).expect("Failed to parse page");
        let name = page.get_component("name").unwrap();
        assert_eq!(name.required, Some(Value::Bool(true)));
        assert!(name.hidden.as_ref().is_some_and(Value::is_array));
        assert!(name.properties.contains_key("textResourceBindings"));
        assert_eq!(
            name.binding("simpleBinding").map(|b| b.field.as_str()),
            Some("person.name")
        );
    }

    #[test]
    fn test_from_json_reports_malformed_input() {
        let err = Page::from_json("page1", "{ not json").unwrap_err();
        assert!(matches!(err, LayoutError::Json { path, .. } if path == "page1"));
    }
}
