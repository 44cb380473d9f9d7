// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Error;
use crate::resources::{ResourceRef, ResourceSpec};

/// Performs individual create-or-update, delete and pause operations against
/// the storage backend. Injected into the engine; implementations return the
/// `OperationNotDone` sentinel while an asynchronous backend operation is
/// still progressing, and are expected to normalise not-found on delete to
/// success.
#[async_trait]
pub trait ResourceReconciler<K>: Send + Sync {
    async fn create_or_update_resource(
        &self,
        spec: &dyn ResourceSpec<K>,
        service_name: &str,
    ) -> Result<K, Error>;

    async fn delete_resource(&self, resource: &ResourceRef, service_name: &str)
        -> Result<(), Error>;

    async fn pause_resource(&self, resource: &ResourceRef, service_name: &str)
        -> Result<(), Error>;
}

#[async_trait]
impl<K, T> ResourceReconciler<K> for Arc<T>
where
    K: Send + 'static,
    T: ResourceReconciler<K> + ?Sized,
{
    async fn create_or_update_resource(
        &self,
        spec: &dyn ResourceSpec<K>,
        service_name: &str,
    ) -> Result<K, Error> {
        (**self).create_or_update_resource(spec, service_name).await
    }

    async fn delete_resource(
        &self,
        resource: &ResourceRef,
        service_name: &str,
    ) -> Result<(), Error> {
        (**self).delete_resource(resource, service_name).await
    }

    async fn pause_resource(
        &self,
        resource: &ResourceRef,
        service_name: &str,
    ) -> Result<(), Error> {
        (**self).pause_resource(resource, service_name).await
    }
}
