//! Canonical identifiers for resources in a manifest set.
//!
//! A [`ResourceId`] renders as `<namespace>:<kind>/<name>`. The namespace segment has three forms:
//!
//! - `<cluster>` when the manifest declared no namespace and nothing has been resolved yet
//! - the empty string once the resource resolved to cluster scope
//! - the namespace itself otherwise
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manifest::ResourceRecord;

/// Namespace segment written for resources with no declared namespace
pub const UNDECLARED_MARKER: &str = "<cluster>";

/// Kind assumed by the legacy `namespace/name` form
const LEGACY_KIND: &str = "service";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid resource id {0:?}")]
/// Failed to parse a resource id.
pub struct ParseResourceIdError(pub String);

/// Namespace segment of a [`ResourceId`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdNamespace {
    /// No namespace declared, not yet resolved
    Undeclared,
    /// Resolved to cluster scope
    Cluster,
    /// A concrete namespace, either declared or resolved
    Namespaced(String),
}

impl IdNamespace {
    /// The namespace as it appears in the id string
    pub fn as_segment(&self) -> &str {
        match self {
            IdNamespace::Undeclared => UNDECLARED_MARKER,
            IdNamespace::Cluster => "",
            IdNamespace::Namespaced(ns) => ns,
        }
    }

    fn from_declared(namespace: Option<&str>) -> Self {
        match namespace {
            Some(ns) if !ns.is_empty() => IdNamespace::Namespaced(ns.into()),
            _ => IdNamespace::Undeclared,
        }
    }

    fn from_effective(namespace: &str) -> Self {
        if namespace.is_empty() {
            IdNamespace::Cluster
        } else {
            IdNamespace::Namespaced(namespace.into())
        }
    }
}

/// Canonical key of a resource in a manifest set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    namespace: IdNamespace,
    kind: String,
    name: String,
}

impl ResourceId {
    /// Build an id, lowercasing the kind
    pub fn new(namespace: IdNamespace, kind: &str, name: &str) -> Self {
        Self {
            namespace,
            kind: kind.to_ascii_lowercase(),
            name: name.into(),
        }
    }

    /// Id of a record before namespace resolution, as written in its manifest
    pub fn declared(record: &ResourceRecord) -> Self {
        Self::new(
            IdNamespace::from_declared(record.namespace.as_deref()),
            &record.group_kind.kind,
            &record.name,
        )
    }

    /// Id of a record after resolving its effective namespace
    ///
    /// An empty `effective` namespace means the record is cluster-scoped.
    pub fn resolved(record: &ResourceRecord, effective: &str) -> Self {
        Self::new(
            IdNamespace::from_effective(effective),
            &record.group_kind.kind,
            &record.name,
        )
    }

    /// The namespace segment
    pub fn namespace(&self) -> &IdNamespace {
        &self.namespace
    }

    /// The lowercased kind
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the namespace segment reflects a resolution rather than the raw manifest
    pub fn is_resolved(&self) -> bool {
        !matches!(self.namespace, IdNamespace::Undeclared)
    }

    /// Parse an id that may omit the namespace segment (`kind/name`), using `namespace` for it
    ///
    /// The qualified form is tried first, so `clusterrole/system:foo` is a name containing `:`.
    /// The legacy `namespace/name` form is not accepted here.
    pub fn parse_with_default_namespace(namespace: &str, s: &str) -> Result<Self, ParseResourceIdError> {
        if let Some(id) = Self::parse_qualified(s) {
            return Ok(id);
        }
        let (kind, name) = split_kind_name(s).ok_or_else(|| ParseResourceIdError(s.into()))?;
        Ok(Self::new(IdNamespace::from_effective(namespace), kind, name))
    }

    fn parse_qualified(s: &str) -> Option<Self> {
        let (ns, rest) = s.split_once(':')?;
        let namespace = match ns {
            UNDECLARED_MARKER => IdNamespace::Undeclared,
            "" => IdNamespace::Cluster,
            ns if is_segment(ns) => IdNamespace::Namespaced(ns.into()),
            _ => return None,
        };
        let (kind, name) = split_kind_name(rest)?;
        Some(Self::new(namespace, kind, name))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.namespace.as_segment(), self.kind, self.name)
    }
}

impl FromStr for ResourceId {
    type Err = ParseResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = Self::parse_qualified(s) {
            return Ok(id);
        }
        // legacy `namespace/name`, names could not contain dots back then
        match s.split_once('/') {
            Some((ns, name)) if is_segment(ns) && is_segment(name) => Ok(Self::new(
                IdNamespace::Namespaced(ns.into()),
                LEGACY_KIND,
                name,
            )),
            _ => Err(ParseResourceIdError(s.into())),
        }
    }
}

impl TryFrom<String> for ResourceId {
    type Error = ParseResourceIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.to_string()
    }
}

fn split_kind_name(s: &str) -> Option<(&str, &str)> {
    let (kind, name) = s.split_once('/')?;
    (is_segment(kind) && is_name(name)).then_some((kind, name))
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_should_follow_expected_format() {
        let undeclared = ResourceId::new(IdNamespace::Undeclared, "Deployment", "noNamespace");
        assert_eq!(undeclared.to_string(), "<cluster>:deployment/noNamespace");

        let cluster = ResourceId::new(IdNamespace::Cluster, "Namespace", "notNamespaced");
        assert_eq!(cluster.to_string(), ":namespace/notNamespaced");

        let namespaced = ResourceId::new(IdNamespace::Namespaced("foo-ns".into()), "Deployment", "app");
        assert_eq!(namespaced.to_string(), "foo-ns:deployment/app");
    }

    #[test]
    fn parse_inverts_display() {
        for s in [
            "<cluster>:deployment/noNamespace",
            ":clusterrole/system:controller:foo",
            "foo-ns:configmap/my.config",
            "kube_system:service/dns",
        ] {
            let id: ResourceId = s.parse().unwrap();
            assert_eq!(id.to_string(), s);
        }
    }

    #[test]
    fn undeclared_and_cluster_are_distinct() {
        let undeclared: ResourceId = "<cluster>:namespace/foo".parse().unwrap();
        let cluster: ResourceId = ":namespace/foo".parse().unwrap();
        assert_ne!(undeclared, cluster);
        assert!(!undeclared.is_resolved());
        assert!(cluster.is_resolved());
        assert_eq!(cluster.namespace(), &IdNamespace::Cluster);
    }

    #[test]
    fn legacy_form_is_a_service() {
        let id: ResourceId = "default/helloworld".parse().unwrap();
        assert_eq!(id.to_string(), "default:service/helloworld");
        assert_eq!(id.kind(), "service");
        assert_eq!(id.name(), "helloworld");
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        for bad in [
            "",
            "foo",
            "ns:deployment",
            "ns:deployment/",
            "ns:/name",
            "n s:deployment/name",
            "<other>:deployment/name",
            "ns:deployment/na/me",
            "default/hello.world",
        ] {
            assert!(bad.parse::<ResourceId>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn default_namespace_fills_missing_segment() {
        let id = ResourceId::parse_with_default_namespace("fallback", "Deployment/app").unwrap();
        assert_eq!(id.to_string(), "fallback:deployment/app");

        let id = ResourceId::parse_with_default_namespace("fallback", "other:deployment/app").unwrap();
        assert_eq!(id.to_string(), "other:deployment/app");
    }

    #[test]
    fn default_namespace_applies_to_names_with_colons() {
        let id =
            ResourceId::parse_with_default_namespace("fallback", "clusterrole/system:controller").unwrap();
        assert_eq!(id.to_string(), "fallback:clusterrole/system:controller");
        assert_eq!(id.name(), "system:controller");

        let id =
            ResourceId::parse_with_default_namespace("fallback", ":clusterrole/system:controller").unwrap();
        assert_eq!(id.namespace(), &IdNamespace::Cluster);

        for bad in ["", "clusterrole", "n s:clusterrole/foo", "clusterrole/"] {
            assert!(
                ResourceId::parse_with_default_namespace("fallback", bad).is_err(),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn serializes_as_string() {
        let id: ResourceId = "foo-ns:deployment/app".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""foo-ns:deployment/app""#);
        let back: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
