// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT

//! Declarative reconciliation engine for cloud sub-resources managed through
//! Kubernetes-style custom resources. A [`Service`] drives a set of desired
//! resource specs toward the stored state via an injected
//! [`ResourceReconciler`] and reports the aggregated outcome as a single
//! condition on the owning cluster object.

pub mod conditions;
pub mod errors;
pub mod reconciler;
pub mod resources;
pub mod scope;
pub mod service;
pub mod storage;

pub use conditions::{check_ready, Condition, ConditionStatus, READY_CONDITION};
pub use errors::{is_operation_not_done, is_resource_not_found, prioritize, Error};
pub use reconciler::ResourceReconciler;
pub use resources::{ResourceRef, ResourceSpec, StoredObject};
pub use scope::Scope;
pub use service::{
    ListFn, PostCreateOrUpdateHook, PostDeleteHook, PostReconcileHook, Service, ServiceBuilder,
    RECONCILE_TIMEOUT_FLOOR,
};
pub use storage::api_list_fn;
