use crate::error::DataAccessError;
use formtree_instance::{DataElement, DataElementIdentifier, Instance};
use formtree_layout::ModelBinding;
use futures::future::BoxFuture;
use serde_json::Value;

/// Read access to the instance's form data.
///
/// Lookups may hit storage, so they return futures. Futures are boxed to keep
/// the trait object-safe; implementations backed by memory can return
/// `futures::future::ready(..).boxed()`.
///
/// Context generation only ever reads through this trait.
pub trait DataAccessor: Send + Sync {
    /// Length of the collection `binding` points at, within `data_element`.
    ///
    /// `index_path` fills in the row of every enclosing collection, outermost
    /// first. `Ok(None)` means the binding does not resolve to a collection.
    fn get_collection_length<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<usize>, DataAccessError>>;

    /// Scalar (or object) value `binding` points at. `Ok(None)` when absent or null.
    fn get_value<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<Value>, DataAccessError>>;

    /// Data elements of `data_type`, in the order the instance lists them
    fn data_elements_of_type(&self, instance: &Instance, data_type: &str) -> Vec<DataElementIdentifier> {
        instance
            .data_elements_of_type(data_type)
            .map(DataElement::identifier)
            .collect()
    }
}

impl<T: DataAccessor + ?Sized> DataAccessor for &T {
    fn get_collection_length<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<usize>, DataAccessError>> {
        (**self).get_collection_length(binding, data_element, index_path)
    }

    fn get_value<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<Value>, DataAccessError>> {
        (**self).get_value(binding, data_element, index_path)
    }

    fn data_elements_of_type(&self, instance: &Instance, data_type: &str) -> Vec<DataElementIdentifier> {
        (**self).data_elements_of_type(instance, data_type)
    }
}

impl<T: DataAccessor + ?Sized> DataAccessor for std::sync::Arc<T> {
    fn get_collection_length<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<usize>, DataAccessError>> {
        (**self).get_collection_length(binding, data_element, index_path)
    }

    fn get_value<'a>(
        &'a self,
        binding: &'a ModelBinding,
        data_element: &'a DataElementIdentifier,
        index_path: &'a [usize],
    ) -> BoxFuture<'a, Result<Option<Value>, DataAccessError>> {
        (**self).get_value(binding, data_element, index_path)
    }

    fn data_elements_of_type(&self, instance: &Instance, data_type: &str) -> Vec<DataElementIdentifier> {
        (**self).data_elements_of_type(instance, data_type)
    }
}
