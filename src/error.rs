use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the editing kernel.
///
/// Every failure is detected synchronously, before any state is mutated;
/// a returned error always means the model is unchanged.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("referenced object {uuid} does not exist in the scene")]
    InvalidReference { uuid: Uuid },

    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("object {uuid} cannot be removed")]
    NotRemovable { uuid: Uuid },

    #[error("moving {uuid} would create a cycle in the scene tree")]
    CycleDetected { uuid: Uuid },

    #[error("duplicate uuid {uuid}")]
    DuplicateUuid { uuid: Uuid },

    #[error("malformed project: {reason}")]
    MalformedProject { reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
