//! Namespace scoping of API kinds.
use std::{fmt, str::FromStr};

pub use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope, ResourceScope, SubResourceScope};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gvk::GroupKind;

/// Resource scope
///
/// Serialized the way a `CustomResourceDefinition` spells it in `spec.scope`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Scope {
    /// Objects are global
    Cluster,
    /// Each object lives in namespace.
    Namespaced,
}

impl Scope {
    /// Whether objects of this scope are partitioned by namespace
    pub fn is_namespaced(self) -> bool {
        matches!(self, Scope::Namespaced)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Cluster => f.write_str("Cluster"),
            Scope::Namespaced => f.write_str("Namespaced"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown resource scope: {0:?}")]
/// Failed to parse a resource scope.
pub struct ParseScopeError(pub String);

impl FromStr for Scope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cluster" => Ok(Scope::Cluster),
            "Namespaced" => Ok(Scope::Namespaced),
            other => Err(ParseScopeError(other.into())),
        }
    }
}

/// Getters for the compile-time scope of k8s-openapi types
///
/// This allows getting information out of k8s-openapi::ResourceScope
/// without the need for specialization.
pub trait TypedScope {
    /// The scope, or `None` when the type is not a standalone resource
    fn scope() -> Option<Scope>;
}

impl TypedScope for ClusterResourceScope {
    fn scope() -> Option<Scope> {
        Some(Scope::Cluster)
    }
}

impl TypedScope for NamespaceResourceScope {
    fn scope() -> Option<Scope> {
        Some(Scope::Namespaced)
    }
}

impl TypedScope for SubResourceScope {
    fn scope() -> Option<Scope> {
        None
    }
}

/// The [`GroupKind`] and scope of a typed k8s-openapi resource
pub fn typed_scope<K>() -> Option<(GroupKind, Scope)>
where
    K: k8s_openapi::Resource,
    K::Scope: TypedScope,
{
    let scope = <K::Scope as TypedScope>::scope()?;
    Some((GroupKind::gk(K::GROUP, K::KIND), scope))
}
