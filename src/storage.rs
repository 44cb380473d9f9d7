// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::fmt::Debug;

use k8s_openapi::NamespaceResourceScope;
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;

use crate::service::ListFn;

/// Adapts a typed `kube` API into the engine's list function: enumerates all
/// stored objects of kind `K` in the given namespace for the orphan sweep.
pub fn api_list_fn<K>() -> ListFn<Client, K>
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    Box::new(|client: Client, namespace: String| {
        Box::pin(async move {
            let api: Api<K> = Api::namespaced(client, &namespace);
            let objects = api.list(&ListParams::default()).await?;
            Ok(objects.items)
        })
    })
}
