// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::fmt;

use async_trait::async_trait;
use kube::core::GroupVersionKind;

use crate::conditions::Condition;
use crate::errors::Error;

/// Identity of one stored object: name, namespace (where the backend uses
/// one) and group-version-kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceRef {
    pub name: String,
    pub namespace: Option<String>,
    pub gvk: GroupVersionKind,
}

impl ResourceRef {
    pub fn new(gvk: GroupVersionKind, name: impl Into<String>) -> Self {
        ResourceRef {
            name: name.into(),
            namespace: None,
            gvk,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// `namespace/name`, or just `name` for cluster-scoped objects.
    pub fn namespaced_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// `Kind.group`, or just `Kind` for the core group.
    pub fn group_kind(&self) -> String {
        if self.gvk.group.is_empty() {
            self.gvk.kind.clone()
        } else {
            format!("{}.{}", self.gvk.kind, self.gvk.group)
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.group_kind(), self.namespaced_name())
    }
}

/// A persisted record owned by the storage backend. The engine only reads
/// identity and status conditions from it.
pub trait StoredObject: Clone + Send + Sync {
    fn name(&self) -> &str;
    fn namespace(&self) -> Option<&str>;
    fn conditions(&self) -> &[Condition];
    fn resource_ref(&self) -> ResourceRef;
}

/// Declarative description of one desired sub-resource.
#[async_trait]
pub trait ResourceSpec<K>: Send + Sync {
    /// Reference of the object this spec drives.
    fn resource_ref(&self) -> ResourceRef;

    /// Produces the full desired body, merged with the existing stored body
    /// when there is one. Called by the injected reconciler, not by the
    /// engine.
    async fn parameters(&self, existing: Option<&K>) -> Result<K, Error>;

    /// Whether a previously-existing object was managed by this system. Used
    /// only by deletion policy downstream.
    fn was_managed(&self, existing: &K) -> bool;
}
