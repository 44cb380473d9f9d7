// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::cmp;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{error, info, instrument};

use crate::conditions::check_ready;
use crate::errors::{is_operation_not_done, prioritize, Error};
use crate::reconciler::ResourceReconciler;
use crate::resources::{ResourceSpec, StoredObject};
use crate::scope::Scope;

/// Lower bound on the reconcile deadline. Absorbs rate-limited backend
/// retries; the requested timeout never shrinks it.
pub const RECONCILE_TIMEOUT_FLOOR: Duration = Duration::from_secs(120);

/// Enumerates all stored objects of the service's kind in the owner's
/// namespace, for the orphan sweep.
pub type ListFn<C, K> =
    Box<dyn Fn(C, String) -> BoxFuture<'static, Result<Vec<K>, Error>> + Send + Sync>;

/// Runs after each create-or-update with the operation's result and error,
/// and returns the error to keep for that operation. May swallow an
/// in-progress error by returning `None` or replace it with its own.
pub type PostCreateOrUpdateHook<P, K> = Box<
    dyn for<'a> Fn(&'a P, Option<&'a K>, Option<Error>) -> BoxFuture<'a, Option<Error>>
        + Send
        + Sync,
>;

/// Runs after the whole reconcile pass with the aggregated error and returns
/// the error to report.
pub type PostReconcileHook<P> =
    Box<dyn for<'a> Fn(&'a P, Option<Error>) -> BoxFuture<'a, Option<Error>> + Send + Sync>;

/// Runs after the whole delete pass with the aggregated error and returns the
/// error to report.
pub type PostDeleteHook<P> =
    Box<dyn for<'a> Fn(&'a P, Option<Error>) -> BoxFuture<'a, Option<Error>> + Send + Sync>;

/// One reconciliation service: a resource kind, the specs to drive this pass,
/// the injected per-object reconciler and the scope to report through.
/// Constructed per controller tick via [`ServiceBuilder`], driven once,
/// discarded. The engine itself holds no state across passes.
pub struct Service<K, R, P: Scope> {
    name: String,
    condition_type: String,
    reconciler: R,
    scope: Arc<P>,
    specs: Vec<Box<dyn ResourceSpec<K>>>,
    list_fn: Option<ListFn<P::Client, K>>,
    post_create_or_update_hook: Option<PostCreateOrUpdateHook<P, K>>,
    post_reconcile_hook: Option<PostReconcileHook<P>>,
    post_delete_hook: Option<PostDeleteHook<P>>,
}

/// Binds a concrete resource type, reconciler and scope into a named
/// [`Service`].
pub struct ServiceBuilder<K, R, P: Scope> {
    service: Service<K, R, P>,
}

impl<K, R, P: Scope> ServiceBuilder<K, R, P> {
    pub fn new(
        name: impl Into<String>,
        condition_type: impl Into<String>,
        reconciler: R,
        scope: Arc<P>,
    ) -> Self {
        ServiceBuilder {
            service: Service {
                name: name.into(),
                condition_type: condition_type.into(),
                reconciler,
                scope,
                specs: Vec::new(),
                list_fn: None,
                post_create_or_update_hook: None,
                post_reconcile_hook: None,
                post_delete_hook: None,
            },
        }
    }

    pub fn spec(mut self, spec: impl ResourceSpec<K> + 'static) -> Self {
        self.service.specs.push(Box::new(spec));
        self
    }

    pub fn specs(mut self, specs: Vec<Box<dyn ResourceSpec<K>>>) -> Self {
        self.service.specs = specs;
        self
    }

    pub fn list_fn(mut self, list_fn: ListFn<P::Client, K>) -> Self {
        self.service.list_fn = Some(list_fn);
        self
    }

    pub fn post_create_or_update_hook(mut self, hook: PostCreateOrUpdateHook<P, K>) -> Self {
        self.service.post_create_or_update_hook = Some(hook);
        self
    }

    pub fn post_reconcile_hook(mut self, hook: PostReconcileHook<P>) -> Self {
        self.service.post_reconcile_hook = Some(hook);
        self
    }

    pub fn post_delete_hook(mut self, hook: PostDeleteHook<P>) -> Self {
        self.service.post_delete_hook = Some(hook);
        self
    }

    pub fn build(self) -> Service<K, R, P> {
        self.service
    }
}

pub(crate) fn effective_reconcile_timeout(requested: Duration) -> Duration {
    cmp::max(requested, RECONCILE_TIMEOUT_FLOOR)
}

impl<K, R, P> Service<K, R, P>
where
    K: StoredObject + 'static,
    R: ResourceReconciler<K>,
    P: Scope,
{
    pub fn builder(
        name: impl Into<String>,
        condition_type: impl Into<String>,
        reconciler: R,
        scope: Arc<P>,
    ) -> ServiceBuilder<K, R, P> {
        ServiceBuilder::new(name, condition_type, reconciler, scope)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition_type(&self) -> &str {
        &self.condition_type
    }

    /// Drives every spec toward its desired state: sweeps orphans when a list
    /// function is configured, creates or updates each spec in declared
    /// order, applies the hooks and records the aggregated outcome on the
    /// owner's condition.
    ///
    /// Errors from independent operations are merged under the
    /// real > not-done > none precedence. The one path that skips the status
    /// update is the refusal to create a missing object when the scope policy
    /// forbids it.
    ///
    /// Known limitation, kept for compatibility: when the list call itself
    /// fails, the failure seeds the result error and the create loop still
    /// runs with an empty index, so every spec is treated as new even though
    /// the true state is unknown.
    #[instrument(skip_all, fields(service = %self.name))]
    pub async fn reconcile(&self) -> Result<(), Error> {
        let timeout = effective_reconcile_timeout(self.scope.reconcile_timeout());
        let mut result = match tokio::time::timeout(timeout, self.reconcile_specs()).await {
            Ok(Ok(result)) => result,
            // Creation refused by policy: the outer controller decides, no
            // hook and no status update.
            Ok(Err(err)) => return Err(err),
            Err(_) => Some(Error::DeadlineExceeded {
                operation: "reconcile",
                timeout,
            }),
        };

        if let Some(hook) = &self.post_reconcile_hook {
            result = hook(self.scope.as_ref(), result).await;
        }

        self.scope
            .update_put_status(&self.condition_type, &self.name, result.as_ref());
        match result {
            None => {
                info!(condition = %self.condition_type, "reconciled");
                Ok(())
            }
            Some(err) => {
                error!(condition = %self.condition_type, %err, "reconcile failed");
                Err(err)
            }
        }
    }

    /// The pass body, bounded by the reconcile deadline. `Err` short-circuits
    /// the whole call (policy refusal); `Ok(Some(..))` is a completed pass
    /// that ends in the given error.
    async fn reconcile_specs(&self) -> Result<Option<Error>, Error> {
        let mut result: Option<Error> = None;
        let mut in_list: HashMap<String, K> = HashMap::new();

        if let Some(list_fn) = &self.list_fn {
            let desired: HashSet<String> =
                self.specs.iter().map(|s| s.resource_ref().name).collect();
            let namespace = self.scope.owner().namespace.unwrap_or_default();
            match list_fn(self.scope.client(), namespace).await {
                Ok(current) => {
                    for obj in &current {
                        if desired.contains(obj.name()) {
                            continue;
                        }
                        let target = obj.resource_ref();
                        info!(resource = %target, "deleting orphaned resource");
                        let err = self
                            .reconciler
                            .delete_resource(&target, &self.name)
                            .await
                            .err();
                        result = prioritize(result, err);
                    }
                    for obj in current {
                        in_list.insert(obj.name().to_string(), obj);
                    }
                }
                // A transient list failure must not block forward progress on
                // individual specs; the create loop runs with an empty index.
                Err(err) => result = prioritize(result, Some(err)),
            }
        }

        for spec in &self.specs {
            let target = spec.resource_ref();
            if let Some(existing) = in_list.get(&target.name) {
                if let Err(err) = check_ready(existing.conditions()) {
                    // Downstream services may depend on this one, so the rest
                    // of the specs are not attempted this pass.
                    result = Some(Error::NotYetReconciled {
                        resource: target.namespaced_name(),
                        source: Box::new(err),
                    });
                    break;
                }
                continue;
            }

            if !self.scope.create_if_not_exists() {
                return Err(Error::WaitingForCreation {
                    namespace: target.namespace.unwrap_or_default(),
                    name: target.name,
                });
            }

            info!(resource = %target, "applying desired resource");
            let (created, err) = match self
                .reconciler
                .create_or_update_resource(spec.as_ref(), &self.name)
                .await
            {
                Ok(obj) => (Some(obj), None),
                Err(err) => (None, Some(err)),
            };
            let err = match &self.post_create_or_update_hook {
                Some(hook) => hook(self.scope.as_ref(), created.as_ref(), err).await,
                None => err,
            };
            result = prioritize(result, err);
        }

        Ok(result)
    }

    /// Tears down every spec's object. All deletes are attempted so that
    /// parallel teardown proceeds while several sub-resources are still
    /// draining; only a real failure stops the loop. An empty spec list
    /// returns without touching the owner's condition.
    #[instrument(skip_all, fields(service = %self.name))]
    pub async fn delete(&self) -> Result<(), Error> {
        if self.specs.is_empty() {
            return Ok(());
        }

        let timeout = self.scope.reconcile_timeout();
        let mut result = match tokio::time::timeout(timeout, self.delete_specs()).await {
            Ok(result) => result,
            Err(_) => Some(Error::DeadlineExceeded {
                operation: "delete",
                timeout,
            }),
        };

        if let Some(hook) = &self.post_delete_hook {
            result = hook(self.scope.as_ref(), result).await;
        }

        self.scope
            .update_delete_status(&self.condition_type, &self.name, result.as_ref());
        match result {
            None => {
                info!(condition = %self.condition_type, "deleted");
                Ok(())
            }
            Some(err) => {
                error!(condition = %self.condition_type, %err, "delete failed");
                Err(err)
            }
        }
    }

    async fn delete_specs(&self) -> Option<Error> {
        let mut result: Option<Error> = None;
        for spec in &self.specs {
            let target = spec.resource_ref();
            info!(resource = %target, "deleting resource");
            if let Err(err) = self.reconciler.delete_resource(&target, &self.name).await {
                let real = !is_operation_not_done(&err);
                result = prioritize(result, Some(err));
                if real {
                    break;
                }
            }
        }
        result
    }

    /// Best-effort pause pass: asks the reconciler to stop driving each
    /// spec's object, in order, stopping at the first failure. Pause is a
    /// control signal, not a reconciliation outcome, so the owner's condition
    /// is left alone.
    #[instrument(skip_all, fields(service = %self.name))]
    pub async fn pause(&self) -> Result<(), Error> {
        for spec in &self.specs {
            let target = spec.resource_ref();
            if let Err(err) = self.reconciler.pause_resource(&target, &self.name).await {
                return Err(Error::PauseFailed {
                    group_kind: target.group_kind(),
                    name: target.name,
                    source: Box::new(err),
                });
            }
        }
        Ok(())
    }
}
