//! Effective namespace of a manifest record.
use std::{fmt, sync::Arc};

use kubesync_core::{GroupKind, ResourceId, ResourceRecord, Scope};
use serde::{Deserialize, Serialize};

use crate::{
    config::{FallbackResolver, KubeconfigLocation, NamespacerConfig},
    error::{ConfigError, UnknownScopeError},
    scope::{ManifestScopes, ScopingOracle},
};

/// How to treat a kind that neither discovery nor the manifest set can classify
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownScopePolicy {
    /// Fail resolution with an [`UnknownScopeError`]
    #[default]
    Reject,
    /// Resolve as if the kind were namespaced
    AssumeNamespaced,
}

/// Decides which namespace each manifest record belongs to.
///
/// Built once per sync run; the fallback namespace is fixed at construction and the
/// oracle is a snapshot, so a `Namespacer` can be shared freely across threads.
///
/// For a record of a cluster-scoped kind the effective namespace is always `""`, even if the
/// manifest declares one. Records of namespaced kinds get their declared namespace, or the
/// fallback when they declare none.
#[derive(Clone)]
pub struct Namespacer {
    oracle: Arc<dyn ScopingOracle>,
    fallback: String,
    unknown_scope: UnknownScopePolicy,
}

impl Namespacer {
    /// Create a `Namespacer` from an oracle and an already resolved fallback namespace
    pub fn new<O>(oracle: O, fallback: impl Into<String>) -> Self
    where
        O: ScopingOracle + 'static,
    {
        Self {
            oracle: Arc::new(oracle),
            fallback: fallback.into(),
            unknown_scope: UnknownScopePolicy::default(),
        }
    }

    /// Resolve the fallback namespace per `config` and create a `Namespacer`
    ///
    /// The kubeconfig at `location` is read here, once, unless `config` sets a default namespace.
    pub fn from_config<O>(
        oracle: O,
        config: &NamespacerConfig,
        location: &KubeconfigLocation,
    ) -> Result<Self, ConfigError>
    where
        O: ScopingOracle + 'static,
    {
        let resolver = FallbackResolver::with_options(location.clone(), config.kubeconfig_options());
        let fallback = resolver.resolve(config.default_namespace.as_deref())?;
        Ok(Self::new(oracle, fallback).unknown_scope(config.unknown_scope))
    }

    /// Set the policy for kinds of unknown scope
    #[must_use]
    pub fn unknown_scope(mut self, policy: UnknownScopePolicy) -> Self {
        self.unknown_scope = policy;
        self
    }

    /// The namespace given to namespaced records that declare none
    pub fn fallback_namespace(&self) -> &str {
        &self.fallback
    }

    /// The effective namespace of `record`, `""` for cluster-scoped kinds
    pub fn effective_namespace(&self, record: &ResourceRecord) -> Result<String, UnknownScopeError> {
        self.resolve(record, None)
    }

    /// Like [`effective_namespace`](Self::effective_namespace), also consulting the CRDs of the manifest set
    ///
    /// Discovery is asked first; `known` only answers for kinds discovery does not know.
    pub fn effective_namespace_with(
        &self,
        record: &ResourceRecord,
        known: &ManifestScopes,
    ) -> Result<String, UnknownScopeError> {
        self.resolve(record, Some(known))
    }

    /// The id of `record` after namespace resolution
    pub fn resource_id(&self, record: &ResourceRecord) -> Result<ResourceId, UnknownScopeError> {
        let ns = self.effective_namespace(record)?;
        Ok(ResourceId::resolved(record, &ns))
    }

    /// The id of `record` after namespace resolution, consulting the CRDs of the manifest set
    pub fn resource_id_with(
        &self,
        record: &ResourceRecord,
        known: &ManifestScopes,
    ) -> Result<ResourceId, UnknownScopeError> {
        let ns = self.effective_namespace_with(record, known)?;
        Ok(ResourceId::resolved(record, &ns))
    }

    /// The scope used for `gk`, after applying the unknown scope policy
    pub fn scope_of(
        &self,
        gk: &GroupKind,
        known: Option<&ManifestScopes>,
    ) -> Result<Scope, UnknownScopeError> {
        let found = self
            .oracle
            .scope_of(gk)
            .or_else(|| known.and_then(|k| k.scope_of(gk)));
        match (found, self.unknown_scope) {
            (Some(scope), _) => Ok(scope),
            (None, UnknownScopePolicy::AssumeNamespaced) => {
                tracing::debug!(kind = %gk, "scope unknown, assuming namespaced");
                Ok(Scope::Namespaced)
            }
            (None, UnknownScopePolicy::Reject) => Err(UnknownScopeError {
                group_kind: gk.clone(),
            }),
        }
    }

    fn resolve(
        &self,
        record: &ResourceRecord,
        known: Option<&ManifestScopes>,
    ) -> Result<String, UnknownScopeError> {
        let ns = match self.scope_of(&record.group_kind, known)? {
            Scope::Cluster => {
                if let Some(declared) = record.declared_namespace() {
                    tracing::debug!(
                        kind = %record.group_kind,
                        name = %record.name,
                        declared,
                        "ignoring namespace of cluster-scoped resource"
                    );
                }
                String::new()
            }
            Scope::Namespaced => record
                .declared_namespace()
                .unwrap_or(self.fallback.as_str())
                .to_string(),
        };
        tracing::trace!(
            kind = %record.group_kind,
            name = %record.name,
            namespace = %ns,
            "resolved effective namespace"
        );
        Ok(ns)
    }
}

impl fmt::Debug for Namespacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespacer")
            .field("fallback", &self.fallback)
            .field("unknown_scope", &self.unknown_scope)
            .finish_non_exhaustive()
    }
}
