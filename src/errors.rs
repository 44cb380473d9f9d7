// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the engine and the collaborators it drives.
///
/// The `OperationNotDone` and `ResourceNotFound` sentinels are identified via
/// the predicates below rather than by matching on message text, so an
/// injected reconciler backed by a different transport only has to construct
/// the matching variants.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend accepted the operation but is still applying it.
    #[error("operation type {operation} on resource {resource} is not done")]
    OperationNotDone { operation: String, resource: String },

    #[error("resource {resource} not found")]
    ResourceNotFound { resource: String },

    /// The stored object carries no `Ready` condition at all.
    #[error("ready status unknown")]
    ReadyUnknown,

    /// The stored object has a `Ready` condition that is not `True`.
    #[error("resource is not Ready: {message}")]
    NotReady { message: String },

    /// An object required by a spec exists but has not finished reconciling.
    #[error("existing resource {resource} is not yet reconciled: {source}")]
    NotYetReconciled {
        resource: String,
        #[source]
        source: Box<Error>,
    },

    /// Creation is forbidden by scope policy and the object does not exist.
    //
    // The message spelling is historical and kept verbatim; callers depend
    // on it.
    #[error("waiting for resource {namespace}/{name} to be crated")]
    WaitingForCreation { namespace: String, name: String },

    #[error("failed to pause {group_kind} {name}: {source}")]
    PauseFailed {
        group_kind: String,
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{operation} did not complete within {timeout:?}")]
    DeadlineExceeded {
        operation: &'static str,
        timeout: Duration,
    },

    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn is_operation_not_done(&self) -> bool {
        matches!(self, Error::OperationNotDone { .. })
    }

    pub fn is_resource_not_found(&self) -> bool {
        match self {
            Error::ResourceNotFound { .. } => true,
            Error::Kube(kube::Error::Api(resp)) => resp.code == 404,
            _ => false,
        }
    }
}

/// Whether the error only signals that an asynchronous backend operation is
/// still in progress.
pub fn is_operation_not_done(err: &Error) -> bool {
    err.is_operation_not_done()
}

/// Whether the error signals that the target object is gone. Injected
/// reconcilers normally swallow this during delete; the predicate is for the
/// ones that do not.
pub fn is_resource_not_found(err: &Error) -> bool {
    err.is_resource_not_found()
}

/// Merges the error accumulated so far with the error from the latest
/// operation, keeping the more actionable of the two:
///
/// real failure > operation-not-done > none, first encountered wins ties.
pub fn prioritize(prev: Option<Error>, next: Option<Error>) -> Option<Error> {
    match (prev, next) {
        (prev, None) => prev,
        (None, next) => next,
        (Some(prev), Some(next)) => {
            if !prev.is_operation_not_done() {
                Some(prev)
            } else if !next.is_operation_not_done() {
                Some(next)
            } else {
                Some(prev)
            }
        }
    }
}
