//! Layout-set registry.
//!
//! [`LayoutModel`] owns every layout-set of an app, keyed by id, and marks one
//! of them as the default. Sub-forms resolve their referenced set through
//! [`LayoutModel::layout_set`]. The sets live behind an `Arc`, so switching
//! the default (e.g. for another process task) is a cheap clone.

use crate::component::Component;
use crate::error::{LayoutError, LayoutResult};
use crate::layout_set::LayoutSet;
use crate::page::Page;
use crate::visitor::{walk_component, Visitor};
use formtree_instance::{DataElementIdentifier, DataType, Instance};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug)]
struct Registry {
    sets: Vec<LayoutSet>,
    lookup: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct LayoutModel {
    registry: Arc<Registry>,
    default_index: usize,
}

impl LayoutModel {
    /// Register `layout_sets`. The default is `default_id` when given, the
    /// first-declared set otherwise.
    #[instrument(skip(layout_sets), fields(layout_sets = layout_sets.len()))]
    pub fn new(layout_sets: Vec<LayoutSet>, default_id: Option<&str>) -> LayoutResult<Self> {
        if layout_sets.is_empty() {
            return Err(LayoutError::NoLayoutSets);
        }

        let mut lookup = HashMap::with_capacity(layout_sets.len());
        for (index, set) in layout_sets.iter().enumerate() {
            if lookup.insert(set.id().to_string(), index).is_some() {
                return Err(LayoutError::DuplicateLayoutSet {
                    id: set.id().to_string(),
                });
            }
        }

        let default_index = match default_id {
            Some(id) => *lookup
                .get(id)
                .ok_or_else(|| LayoutError::UnknownLayoutSet { id: id.to_string() })?,
            None => 0,
        };

        debug!(default = %layout_sets[default_index].id(), "Registered layout sets");
        Ok(Self {
            registry: Arc::new(Registry {
                sets: layout_sets,
                lookup,
            }),
            default_index,
        })
    }

    /// Same layout-sets, different default
    pub fn with_default(&self, layout_set_id: &str) -> LayoutResult<Self> {
        let default_index = *self
            .registry
            .lookup
            .get(layout_set_id)
            .ok_or_else(|| LayoutError::UnknownLayoutSet {
                id: layout_set_id.to_string(),
            })?;
        Ok(Self {
            registry: Arc::clone(&self.registry),
            default_index,
        })
    }

    /// Default to the layout-set serving the instance's current task, keeping
    /// the current default when no set claims that task.
    pub fn for_instance(&self, instance: &Instance) -> Self {
        let index = instance
            .current_task()
            .and_then(|task| {
                self.registry
                    .sets
                    .iter()
                    .position(|set| set.handles_task(task))
            })
            .unwrap_or(self.default_index);
        Self {
            registry: Arc::clone(&self.registry),
            default_index: index,
        }
    }

    pub fn default_layout_set(&self) -> &LayoutSet {
        &self.registry.sets[self.default_index]
    }

    pub fn layout_sets(&self) -> &[LayoutSet] {
        &self.registry.sets
    }

    pub fn try_layout_set(&self, layout_set_id: &str) -> Option<&LayoutSet> {
        self.registry
            .lookup
            .get(layout_set_id)
            .map(|&index| &self.registry.sets[index])
    }

    pub fn layout_set(&self, layout_set_id: &str) -> LayoutResult<&LayoutSet> {
        self.try_layout_set(layout_set_id)
            .ok_or_else(|| LayoutError::UnknownLayoutSet {
                id: layout_set_id.to_string(),
            })
    }

    pub fn layout_set_for_task(&self, task_id: &str) -> Option<&LayoutSet> {
        self.registry.sets.iter().find(|set| set.handles_task(task_id))
    }

    pub fn get_default_data_type(&self) -> &DataType {
        self.default_layout_set().default_data_type()
    }

    /// Component on a page of the default layout-set
    pub fn get_component(&self, page_name: &str, component_id: &str) -> LayoutResult<&Component> {
        self.default_layout_set().get_component(page_name, component_id)
    }

    /// Every component of the default layout-set, page roots included.
    ///
    /// Stack-based depth-first walk: pages and group children are pushed in
    /// declared order, so each level is visited last-declared first.
    pub fn get_components(&self) -> ComponentIter<'_> {
        ComponentIter {
            stack: self
                .default_layout_set()
                .pages()
                .iter()
                .map(|page| (page, page.root()))
                .collect(),
        }
    }

    pub fn get_default_data_element_id(&self, instance: &Instance) -> Option<DataElementIdentifier> {
        self.default_layout_set().get_default_data_element_id(instance)
    }

    /// Fail if any sub-form, in any layout-set, points at an unregistered set.
    ///
    /// Context generation hits the same error lazily; this lets a host reject
    /// a broken app at startup instead.
    pub fn check_sub_form_references(&self) -> LayoutResult<()> {
        struct References<'a> {
            found: Vec<&'a str>,
        }

        impl<'a> Visitor<'a> for References<'a> {
            fn visit_component(&mut self, page: &'a Page, component: &'a Component) {
                if let Some(id) = component.sub_form_layout_set() {
                    self.found.push(id);
                }
                walk_component(self, page, component);
            }
        }

        let mut references = References { found: Vec::new() };
        for set in self.layout_sets() {
            references.visit_layout_set(set);
        }
        for id in references.found {
            self.layout_set(id)?;
        }
        Ok(())
    }
}

/// Iterator returned by [`LayoutModel::get_components`]
pub struct ComponentIter<'a> {
    stack: Vec<(&'a Page, &'a Component)>,
}

impl<'a> Iterator for ComponentIter<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        let (page, component) = self.stack.pop()?;
        self.stack
            .extend(page.children(component).map(|child| (page, child)));
        Some(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::RawComponent;
    use formtree_instance::DataElement;

    fn set(id: &str, data_type: &str, pages: Vec<(&str, Vec<RawComponent>)>) -> LayoutSet {
        let pages = pages
            .into_iter()
            .map(|(name, components)| Page::from_components(name, components).unwrap())
            .collect();
        LayoutSet::new(id, DataType::new(data_type), pages).unwrap()
    }

    fn sample_model(default_id: Option<&str>) -> LayoutModel {
        let main = set(
            "main",
            "model",
            vec![
                (
                    "page1",
                    vec![
                        RawComponent::new("intro", "Paragraph"),
                        RawComponent::new("group", "Group").with_children(&["a", "b"]),
                        RawComponent::new("a", "Input"),
                        RawComponent::new("b", "Input"),
                    ],
                ),
                ("page2", vec![RawComponent::new("vehicles", "Subform").with_layout_set("vehicle")]),
            ],
        )
        .with_tasks(vec!["Task_1".to_string()]);
        let vehicle = set("vehicle", "vehicleModel", vec![("v1", vec![RawComponent::new("reg", "Input")])])
            .with_tasks(vec!["Task_2".to_string()]);
        LayoutModel::new(vec![main, vehicle], default_id).unwrap()
    }

    #[test]
    fn test_default_is_first_declared() {
        let model = sample_model(None);
        assert_eq!(model.default_layout_set().id(), "main");
        assert_eq!(model.get_default_data_type().id, "model");
    }

    #[test]
    fn test_explicit_default() {
        let model = sample_model(Some("vehicle"));
        assert_eq!(model.default_layout_set().id(), "vehicle");
        assert_eq!(model.get_component("v1", "reg").unwrap().id, "reg");
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(LayoutModel::new(vec![], None), Err(LayoutError::NoLayoutSets)));

        let twice = vec![
            set("main", "model", vec![("p", vec![])]),
            set("main", "model", vec![("p", vec![])]),
        ];
        assert!(matches!(
            LayoutModel::new(twice, None),
            Err(LayoutError::DuplicateLayoutSet { .. })
        ));

        let one = vec![set("main", "model", vec![("p", vec![])])];
        assert!(matches!(
            LayoutModel::new(one, Some("other")),
            Err(LayoutError::UnknownLayoutSet { .. })
        ));
    }

    #[test]
    fn test_get_component_lookup() {
        let model = sample_model(None);
        let a = model.get_component("page1", "a").unwrap();
        assert_eq!(a.component_type, "Input");
        assert!(model.get_component("page1", "reg").is_err());
        assert!(model.get_component("v1", "reg").is_err());
    }

    #[test]
    fn test_get_components_stack_order() {
        let model = sample_model(None);
        let ids: Vec<_> = model.get_components().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["page2", "vehicles", "page1", "group", "b", "a", "intro"]);
    }

    #[test]
    fn test_registry_lookups() {
        let model = sample_model(None);
        assert_eq!(model.layout_set("vehicle").unwrap().id(), "vehicle");
        assert!(model.try_layout_set("nope").is_none());
        assert_eq!(model.layout_set_for_task("Task_2").map(LayoutSet::id), Some("vehicle"));
        assert!(model.layout_set_for_task("Task_9").is_none());
    }

    #[test]
    fn test_with_default_and_for_instance_share_sets() {
        let model = sample_model(None);
        let switched = model.with_default("vehicle").unwrap();
        assert_eq!(switched.default_layout_set().id(), "vehicle");
        assert!(Arc::ptr_eq(&model.registry, &switched.registry));
        assert!(model.with_default("nope").is_err());

        let on_task_2 = model.for_instance(&Instance::new("1/a").with_task("Task_2"));
        assert_eq!(on_task_2.default_layout_set().id(), "vehicle");
        let unknown_task = switched.for_instance(&Instance::new("1/a").with_task("Task_9"));
        assert_eq!(unknown_task.default_layout_set().id(), "vehicle");
    }

    #[test]
    fn test_default_data_element_id() {
        let model = sample_model(None);
        let instance = Instance::new("1/a")
            .with_data_element(DataElement::new("v", "vehicleModel"))
            .with_data_element(DataElement::new("m", "model"));
        assert_eq!(
            model.get_default_data_element_id(&instance),
            Some(DataElementIdentifier::from("m"))
        );
    }

    #[test]
    fn test_check_sub_form_references() {
        assert!(sample_model(None).check_sub_form_references().is_ok());

        let broken = LayoutModel::new(
            vec![set(
                "main",
                "model",
                vec![("p", vec![RawComponent::new("s", "Subform").with_layout_set("gone")])],
            )],
            None,
        )
        .unwrap();
        assert!(matches!(
            broken.check_sub_form_references(),
            Err(LayoutError::UnknownLayoutSet { id }) if id == "gone"
        ));
    }
}
