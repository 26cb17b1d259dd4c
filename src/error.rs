//! Error taxonomy for the ancestry engine
//!
//! Every fallible operation in the crate returns [`TreeError`]. Discrete
//! edits fail atomically: when an error is returned the graph is unchanged.

use crate::cat::ParentKind;

/// Errors surfaced by tree operations, the worker, and storage.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A cat id did not resolve to any cat in the tree
    #[error("cat not found: {0}")]
    NotFound(String),

    /// An insert collided with an existing cat id
    #[error("duplicate cat id: {0}")]
    DuplicateId(String),

    /// `add_parent` targeted a slot that is already filled
    #[error("cat {cat_id} already has a {slot}")]
    AlreadyHasParent { cat_id: String, slot: ParentKind },

    /// Bad founding-couple or operation input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value is out of range or inconsistent
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The pre-generation size estimate exceeded the hard limit
    #[error("estimated tree size {estimated} exceeds limit of {limit} cats")]
    TreeTooLarge { estimated: u64, limit: u64 },

    /// A background generation job was cancelled before completion
    #[error("generation cancelled")]
    Cancelled,

    /// The background generation task failed to run to completion
    #[error("generation task failed: {0}")]
    TaskFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TreeError>;
