//! Context builder.
//!
//! Recursively walks a layout-set's component arenas and asks the
//! [`DataAccessor`] how many rows each repeating group has. Dispatch is an
//! exhaustive `match` over [`ComponentKind`]:
//!
//! | kind             | index path of children | data element of children     |
//! |------------------|------------------------|------------------------------|
//! | `Leaf`           | -                      | -                            |
//! | `Group`          | inherited              | inherited                    |
//! | `RepeatingGroup` | inherited + `[row]`    | inherited                    |
//! | `SubForm`        | reset to `[]`          | each matching data element   |
//!
//! Row-count lookups are the only suspension points. Everything runs
//! sequentially so the accessor sees calls in tree order.

use crate::accessor::DataAccessor;
use crate::context::ComponentContext;
use crate::error::{ContextError, ContextResult};
use formtree_instance::{DataElementIdentifier, Instance};
use formtree_layout::{Component, ComponentKind, LayoutModel, LayoutSet, NodeId, Page};
use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, instrument, trace, warn};

/// Builds context trees for one instance.
///
/// Contexts borrow components from the model (`'m`) only. The instance and
/// the accessor (`'d`) are borrowed for the duration of the build, so the
/// returned trees outlive both.
pub struct ContextBuilder<'m, 'd, A: DataAccessor + ?Sized> {
    model: &'m LayoutModel,
    instance: &'d Instance,
    accessor: &'d A,
}

impl<'m, 'd, A: DataAccessor + ?Sized> ContextBuilder<'m, 'd, A> {
    pub fn new(model: &'m LayoutModel, instance: &'d Instance, accessor: &'d A) -> Self {
        Self {
            model,
            instance,
            accessor,
        }
    }

    /// One context per page of the model's default layout-set.
    ///
    /// Empty when the instance has no data element of the default data type
    /// yet.
    #[instrument(skip(self), fields(instance = %self.instance.id, layout_set = %self.model.default_layout_set().id()))]
    pub async fn generate_component_contexts(&self) -> ContextResult<Vec<ComponentContext<'m>>> {
        self.layout_set_contexts(self.model.default_layout_set()).await
    }

    /// One context per page of `layout_set`, rooted at its default data element
    pub async fn layout_set_contexts(&self, layout_set: &'m LayoutSet) -> ContextResult<Vec<ComponentContext<'m>>> {
        let Some(data_element) = layout_set.get_default_data_element_id(self.instance) else {
            debug!(
                data_type = %layout_set.default_data_type().id,
                "No default data element yet, skipping context generation"
            );
            return Ok(Vec::new());
        };

        let chain = [layout_set.id()];
        let mut pages = Vec::with_capacity(layout_set.pages().len());
        for page in layout_set.pages() {
            pages.push(
                self.build(page, page.root(), &data_element, Vec::new(), &chain)
                    .await?,
            );
        }

        debug!(pages = pages.len(), "Generated component contexts");
        Ok(pages)
    }

    /// Context for `component` and everything below it.
    ///
    /// `chain` holds the layout-sets currently being expanded through
    /// sub-forms; re-entering one of them is an error.
    fn build<'s>(
        &'s self,
        page: &'m Page,
        component: &'m Component,
        data_element: &'s DataElementIdentifier,
        indexes: Vec<usize>,
        chain: &'s [&'m str],
    ) -> BoxFuture<'s, ContextResult<ComponentContext<'m>>> {
        async move {
            match &component.kind {
                ComponentKind::Leaf => Ok(ComponentContext::new(
                    component,
                    indexes,
                    None,
                    data_element.clone(),
                    Vec::new(),
                )),

                ComponentKind::Group { children } => {
                    let children = self
                        .build_children(page, children, data_element, &indexes, chain)
                        .await?;
                    Ok(ComponentContext::new(
                        component,
                        indexes,
                        None,
                        data_element.clone(),
                        children,
                    ))
                }

                ComponentKind::RepeatingGroup { children } => {
                    let row_count = match component.group_binding() {
                        Some(binding) => self
                            .accessor
                            .get_collection_length(binding, data_element, &indexes)
                            .await
                            .inspect_err(|err| {
                                warn!(component_id = %component.id, error = %err, "Row count lookup failed");
                            })?,
                        None => {
                            debug!(component_id = %component.id, "Repeating group has no group binding");
                            None
                        }
                    };
                    trace!(component_id = %component.id, ?indexes, ?row_count, "Expanding repeating group");

                    let rows = row_count.unwrap_or(0);
                    let mut contexts = Vec::with_capacity(rows * children.len());
                    for row in 0..rows {
                        let mut row_indexes = Vec::with_capacity(indexes.len() + 1);
                        row_indexes.extend_from_slice(&indexes);
                        row_indexes.push(row);
                        contexts.extend(
                            self.build_children(page, children, data_element, &row_indexes, chain)
                                .await?,
                        );
                    }

                    Ok(ComponentContext::new(
                        component,
                        indexes,
                        row_count,
                        data_element.clone(),
                        contexts,
                    ))
                }

                ComponentKind::SubForm { layout_set_id } => {
                    let target = self.model.layout_set(layout_set_id)?;
                    if chain.contains(&target.id()) {
                        return Err(ContextError::RecursiveSubForm {
                            layout_set: target.id().to_string(),
                            chain: chain.iter().map(|id| id.to_string()).collect(),
                        });
                    }

                    let mut nested_chain = chain.to_vec();
                    nested_chain.push(target.id());

                    let elements = self
                        .accessor
                        .data_elements_of_type(self.instance, &target.default_data_type().id);
                    debug!(
                        component_id = %component.id,
                        layout_set = %target.id(),
                        elements = elements.len(),
                        "Expanding sub-form"
                    );

                    let mut entries = Vec::with_capacity(elements.len());
                    for element in elements {
                        let mut pages = Vec::with_capacity(target.pages().len());
                        for sub_page in target.pages() {
                            pages.push(
                                self.build(sub_page, sub_page.root(), &element, Vec::new(), &nested_chain)
                                    .await?,
                            );
                        }
                        entries.push(ComponentContext::new(component, Vec::new(), None, element, pages));
                    }

                    Ok(ComponentContext::new(
                        component,
                        indexes,
                        None,
                        data_element.clone(),
                        entries,
                    ))
                }
            }
        }
        .boxed()
    }

    async fn build_children(
        &self,
        page: &'m Page,
        children: &'m [NodeId],
        data_element: &DataElementIdentifier,
        indexes: &[usize],
        chain: &[&'m str],
    ) -> ContextResult<Vec<ComponentContext<'m>>> {
        let mut contexts = Vec::with_capacity(children.len());
        for &child in children {
            contexts.push(
                self.build(page, page.node(child), data_element, indexes.to_vec(), chain)
                    .await?,
            );
        }
        Ok(contexts)
    }
}

/// Context generation as an operation on the layout model itself
pub trait GenerateContexts {
    /// See [`ContextBuilder::generate_component_contexts`]
    fn generate_component_contexts<'m: 'd, 'd, A: DataAccessor + ?Sized>(
        &'m self,
        instance: &'d Instance,
        accessor: &'d A,
    ) -> BoxFuture<'d, ContextResult<Vec<ComponentContext<'m>>>>;
}

impl GenerateContexts for LayoutModel {
    fn generate_component_contexts<'m: 'd, 'd, A: DataAccessor + ?Sized>(
        &'m self,
        instance: &'d Instance,
        accessor: &'d A,
    ) -> BoxFuture<'d, ContextResult<Vec<ComponentContext<'m>>>> {
        async move {
            ContextBuilder::new(self, instance, accessor)
                .generate_component_contexts()
                .await
        }
        .boxed()
    }
}
