use std::collections::HashSet;

use kubesync_core::{
    scope::{typed_scope, TypedScope},
    GroupKind, Scope,
};

use super::ScopingOracle;

/// A fixed set of namespaced kinds; every other kind is cluster-scoped.
///
/// Never answers "unknown", so it suits tests and tools that run without a cluster.
///
/// ```
/// use k8s_openapi::api::{apps::v1::Deployment, core::v1::Namespace};
/// use kubesync_client::{ScopingOracle, StaticScopes};
/// use kubesync_core::GroupKind;
///
/// let scopes = StaticScopes::default().with::<Deployment>().with::<Namespace>();
/// assert_eq!(scopes.is_namespaced(&GroupKind::gk("apps", "Deployment")), Some(true));
/// assert_eq!(scopes.is_namespaced(&GroupKind::gk("", "Namespace")), Some(false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticScopes {
    namespaced: HashSet<GroupKind>,
}

impl StaticScopes {
    /// Treat exactly these kinds as namespaced
    pub fn new<I: IntoIterator<Item = GroupKind>>(namespaced: I) -> Self {
        Self {
            namespaced: namespaced.into_iter().collect(),
        }
    }

    /// Add a namespaced kind
    #[must_use]
    pub fn namespaced(mut self, gk: GroupKind) -> Self {
        self.namespaced.insert(gk);
        self
    }

    /// Add a k8s-openapi type if its compile-time scope is namespaced
    #[must_use]
    pub fn with<K>(self) -> Self
    where
        K: k8s_openapi::Resource,
        K::Scope: TypedScope,
    {
        match typed_scope::<K>() {
            Some((gk, Scope::Namespaced)) => self.namespaced(gk),
            _ => self,
        }
    }
}

impl ScopingOracle for StaticScopes {
    fn scope_of(&self, gk: &GroupKind) -> Option<Scope> {
        if self.namespaced.contains(gk) {
            Some(Scope::Namespaced)
        } else {
            Some(Scope::Cluster)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_kinds_are_cluster_scoped() {
        let scopes = StaticScopes::new([GroupKind::gk("apps", "Deployment")]);
        assert_eq!(scopes.scope_of(&GroupKind::gk("apps", "Deployment")), Some(Scope::Namespaced));
        assert_eq!(scopes.scope_of(&GroupKind::gk("", "Namespace")), Some(Scope::Cluster));
        // the group is part of the identity
        assert_eq!(scopes.scope_of(&GroupKind::gk("extensions", "Deployment")), Some(Scope::Cluster));
    }
}
