#![forbid(unsafe_code)]

use interact_dom::NodeId;
use thiserror::Error;

/// Fatal configuration errors raised by scope resolution.
///
/// These indicate a tree the engine cannot reason about; the host should
/// fix its markup rather than retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractError {
    /// The node set is empty or reaches outside the container.
    #[error("nodes must all lie inside one container (found {found})")]
    AmbiguousContainer { found: usize },

    /// The nodes resolve to more than one focus scope.
    #[error("nodes must share one focus scope (found {found})")]
    AmbiguousFocusScope { found: usize },

    /// The container id is not an element of the document.
    #[error("container {0} is not an element of the document")]
    InvalidContainer(NodeId),
}

pub type InteractResult<T> = Result<T, InteractError>;
