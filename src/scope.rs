// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::time::Duration;

use crate::errors::Error;
use crate::resources::ResourceRef;

/// Per-invocation context shared by every service driven in one controller
/// tick: cluster identity, client handle, timeouts, creation policy and the
/// condition-update sinks.
///
/// The engine never mutates a scope; the status sinks must be safe to call
/// from services reconciling different resource kinds in parallel.
pub trait Scope: Send + Sync {
    /// Handle to the storage backend, passed through to the list function.
    /// Generic so tests can drive the engine without a live client.
    type Client: Clone + Send + Sync;

    fn client(&self) -> Self::Client;

    fn cluster_name(&self) -> &str;

    /// The object that sub-resources belong to; provides the namespace the
    /// orphan sweep lists in and the place the aggregated condition lands.
    fn owner(&self) -> ResourceRef;

    /// Desired maximum duration for a reconcile pass, already defaulted by
    /// the caller. `reconcile` enforces a 120s floor on top of this; `delete`
    /// uses it as-is.
    fn reconcile_timeout(&self) -> Duration;

    /// When false the engine refuses to create missing objects and reports a
    /// wait instead.
    fn create_if_not_exists(&self) -> bool;

    /// Records the outcome of a reconcile pass on the owner's condition of
    /// the given type.
    fn update_put_status(&self, condition_type: &str, service_name: &str, result: Option<&Error>);

    /// Records the outcome of a delete pass on the owner's condition of the
    /// given type.
    fn update_delete_status(
        &self,
        condition_type: &str,
        service_name: &str,
        result: Option<&Error>,
    );
}
