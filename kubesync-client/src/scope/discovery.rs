use std::collections::HashMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kubesync_core::{GroupKind, GroupVersion, Scope};

use super::ScopingOracle;
use crate::error::DiscoveryError;

/// Snapshot of the cluster's API discovery, reduced to the scope of each kind.
///
/// Built once per sync run from the `APIResourceList` documents served under `/api/v1`
/// and `/apis/<group>/<version>`. Kinds absent from discovery are unknown.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryScopes {
    scopes: HashMap<GroupKind, Scope>,
}

impl DiscoveryScopes {
    /// An empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from discovery documents
    pub fn from_api_resource_lists<'a, I>(lists: I) -> Result<Self, DiscoveryError>
    where
        I: IntoIterator<Item = &'a APIResourceList>,
    {
        let mut snapshot = Self::new();
        for list in lists {
            snapshot.add_api_resource_list(list)?;
        }
        tracing::debug!(kinds = snapshot.len(), "built scope snapshot from discovery");
        Ok(snapshot)
    }

    /// Record the scope of every resource in one discovery document
    ///
    /// Subresources such as `pods/log` are skipped.
    pub fn add_api_resource_list(&mut self, list: &APIResourceList) -> Result<(), DiscoveryError> {
        let gv: GroupVersion = list
            .group_version
            .parse()
            .map_err(|_| DiscoveryError::InvalidGroupVersion(list.group_version.clone()))?;
        for res in &list.resources {
            // skip subresources
            if res.name.contains('/') {
                continue;
            }
            let group = res.group.clone().unwrap_or_else(|| gv.group.clone());
            let scope = if res.namespaced {
                Scope::Namespaced
            } else {
                Scope::Cluster
            };
            self.insert(GroupKind { group, kind: res.kind.clone() }, scope);
        }
        Ok(())
    }

    /// Record the scope of a single kind
    ///
    /// The first answer for a kind is kept, as all versions of a kind share one scope.
    pub fn insert(&mut self, gk: GroupKind, scope: Scope) {
        match self.scopes.get(&gk) {
            Some(existing) if *existing != scope => {
                tracing::warn!(
                    kind = %gk,
                    %existing,
                    conflicting = %scope,
                    "discovery disagrees on scope, keeping first"
                );
            }
            Some(_) => {}
            None => {
                self.scopes.insert(gk, scope);
            }
        }
    }

    /// Number of kinds in the snapshot
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the snapshot knows no kinds
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl FromIterator<(GroupKind, Scope)> for DiscoveryScopes {
    fn from_iter<T: IntoIterator<Item = (GroupKind, Scope)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (gk, scope) in iter {
            snapshot.insert(gk, scope);
        }
        snapshot
    }
}

impl ScopingOracle for DiscoveryScopes {
    fn scope_of(&self, gk: &GroupKind) -> Option<Scope> {
        self.scopes.get(gk).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource_list(value: serde_json::Value) -> APIResourceList {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn snapshot_from_discovery_documents() {
        let core = resource_list(json!({
            "groupVersion": "v1",
            "resources": [
                { "name": "pods", "singularName": "pod", "namespaced": true, "kind": "Pod", "verbs": [] },
                { "name": "pods/log", "singularName": "", "namespaced": true, "kind": "Pod", "verbs": [] },
                {
                    "name": "namespaces",
                    "singularName": "namespace",
                    "namespaced": false,
                    "kind": "Namespace",
                    "verbs": [],
                },
            ]
        }));
        let apps = resource_list(json!({
            "groupVersion": "apps/v1",
            "resources": [
                {
                    "name": "deployments",
                    "singularName": "deployment",
                    "namespaced": true,
                    "kind": "Deployment",
                    "verbs": [],
                },
            ]
        }));

        let scopes = DiscoveryScopes::from_api_resource_lists([&core, &apps]).unwrap();
        assert_eq!(scopes.len(), 3);
        assert_eq!(scopes.is_namespaced(&GroupKind::gk("", "Pod")), Some(true));
        assert_eq!(scopes.is_namespaced(&GroupKind::gk("", "Namespace")), Some(false));
        assert_eq!(scopes.is_namespaced(&GroupKind::gk("apps", "Deployment")), Some(true));
        assert_eq!(scopes.scope_of(&GroupKind::gk("example.com", "Widget")), None);
    }

    #[test]
    fn invalid_group_version_is_an_error() {
        let list = resource_list(json!({ "groupVersion": "a/b/c", "resources": [] }));
        assert!(matches!(
            DiscoveryScopes::from_api_resource_lists([&list]),
            Err(DiscoveryError::InvalidGroupVersion(gv)) if gv == "a/b/c"
        ));
    }

    #[test]
    fn first_answer_wins() {
        let gk = GroupKind::gk("example.com", "Widget");
        let scopes: DiscoveryScopes = [(gk.clone(), Scope::Cluster), (gk.clone(), Scope::Namespaced)]
            .into_iter()
            .collect();
        assert_eq!(scopes.scope_of(&gk), Some(Scope::Cluster));
    }
}
