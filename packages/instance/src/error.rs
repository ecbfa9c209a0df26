use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("Invalid instance JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Instance '{instance_id}' has no started process")]
    ProcessNotStarted { instance_id: String },
}

pub type InstanceResult<T> = Result<T, InstanceError>;
