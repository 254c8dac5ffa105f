use std::collections::HashMap;

use kubesync_core::{GroupKind, ResourceRecord, Scope};
use serde::Deserialize;

use super::ScopingOracle;

const CRD_GROUP: &str = "apiextensions.k8s.io";
const CRD_KIND: &str = "CustomResourceDefinition";

/// Scopes declared by the `CustomResourceDefinition`s of a manifest set.
///
/// Lets a CRD and its first custom resources be synced together, before discovery
/// knows about the new kind.
#[derive(Debug, Clone, Default)]
pub struct ManifestScopes {
    scopes: HashMap<GroupKind, Scope>,
}

#[derive(Deserialize)]
struct CrdDocument {
    spec: CrdSpec,
}

#[derive(Deserialize)]
struct CrdSpec {
    group: String,
    names: CrdNames,
    scope: String,
}

#[derive(Deserialize)]
struct CrdNames {
    kind: String,
}

impl ManifestScopes {
    /// Collect the scopes of every CRD among `records`
    ///
    /// CRDs whose spec cannot be read are skipped with a warning; applying them will fail
    /// on its own.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceRecord>,
    {
        let crd = GroupKind::gk(CRD_GROUP, CRD_KIND);
        let mut scopes = HashMap::new();
        for record in records.into_iter().filter(|r| r.group_kind == crd) {
            let doc = match CrdDocument::deserialize(&record.data) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(
                        crd = %record.name,
                        source = %record.source,
                        "ignoring unreadable CRD: {err}"
                    );
                    continue;
                }
            };
            match doc.spec.scope.parse::<Scope>() {
                Ok(scope) => {
                    scopes.insert(GroupKind::gk(&doc.spec.group, &doc.spec.names.kind), scope);
                }
                Err(err) => {
                    tracing::warn!(crd = %record.name, source = %record.source, "ignoring CRD: {err}");
                }
            }
        }
        tracing::debug!(kinds = scopes.len(), "collected scopes from manifest CRDs");
        Self { scopes }
    }

    /// Number of kinds declared
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no CRD declared a scope
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl ScopingOracle for ManifestScopes {
    fn scope_of(&self, gk: &GroupKind) -> Option<Scope> {
        self.scopes.get(gk).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubesync_core::{manifest, ManifestSource};

    const CRDS: &str = "
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names:
    kind: Widget
    plural: widgets
  scope: Namespaced
---
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: gadgets.example.com
spec:
  group: example.com
  names:
    kind: Gadget
    plural: gadgets
  scope: Cluster
---
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: broken.example.com
spec:
  group: example.com
  names:
    kind: Broken
  scope: Sideways
---
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: nospec.example.com
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: unrelated
";

    #[test]
    fn collects_declared_crd_scopes() {
        let manifests = manifest::parse_multidoc(CRDS.as_bytes(), ManifestSource::Inline).unwrap();
        let scopes = ManifestScopes::from_records(manifests.values());
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes.scope_of(&GroupKind::gk("example.com", "Widget")), Some(Scope::Namespaced));
        assert_eq!(scopes.scope_of(&GroupKind::gk("example.com", "Gadget")), Some(Scope::Cluster));
        assert_eq!(scopes.scope_of(&GroupKind::gk("example.com", "Broken")), None);
        assert_eq!(scopes.scope_of(&GroupKind::gk("", "ConfigMap")), None);
    }
}
