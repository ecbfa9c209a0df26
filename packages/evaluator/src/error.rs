use formtree_layout::LayoutError;
use thiserror::Error;

/// Failure reported by a [`crate::DataAccessor`]
#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Data element '{id}' is not available")]
    UnknownDataElement { id: String },

    #[error("No data element of type '{data_type}' is available")]
    NoDataElementOfType { data_type: String },

    #[error("Invalid binding '{binding}': {reason}")]
    InvalidBinding { binding: String, reason: String },

    #[error("Data backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error("Recursive sub-form: layout set '{layout_set}' is already being expanded\nChain: {}", chain.join(" → "))]
    RecursiveSubForm {
        layout_set: String,
        chain: Vec<String>,
    },
}

pub type ContextResult<T> = Result<T, ContextError>;
