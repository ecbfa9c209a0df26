//! # Formtree Instance
//!
//! Read-only view of an app instance as the context builder sees it: which
//! process task is active and which data elements exist, each tagged with the
//! id of its data type.
//!
//! Nothing here talks to storage. Instances are deserialized from the JSON
//! shape the storage service hands out (camelCase keys) and passed around by
//! reference.

pub mod data;
pub mod error;
pub mod instance;

pub use data::{DataElement, DataElementIdentifier, DataType};
pub use error::{InstanceError, InstanceResult};
pub use instance::{Instance, ProcessElementInfo, ProcessState};
