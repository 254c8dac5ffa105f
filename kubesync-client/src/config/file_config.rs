use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// [`Kubeconfig`] is the part of a kubeconfig file needed to pick a default namespace
///
/// Stored in `~/.kube/config` by default, but can be distributed across multiple paths
/// passed through `KUBECONFIG`.
/// Clusters, users and other sections are ignored when parsing.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Kubeconfig {
    /// Referencable names to context configs
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub contexts: Vec<NamedContext>,
    /// The name of the context that you would like to use by default
    #[serde(rename = "current-context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,

    /// Legacy field from TypeMeta
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Legacy field from TypeMeta
    #[serde(rename = "apiVersion")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// NamedContext associates name with context.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NamedContext {
    /// Name of the context
    pub name: String,
    /// Associations for the context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

/// Context stores tuple of cluster and user information.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Context {
    /// Name of the cluster for this context
    #[serde(default)]
    pub cluster: String,
    /// Name of the user for this context
    #[serde(default)]
    pub user: String,
    /// The default namespace to use on unspecified requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

impl Kubeconfig {
    /// Read a Config from an arbitrary location
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Kubeconfig, ConfigError> {
        let data = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.as_ref().into(),
            source,
        })?;
        Self::from_yaml(&data)
    }

    /// Read a Config from an arbitrary YAML string
    ///
    /// Multi-document text is merged into a single `Kubeconfig`; empty text gives an empty one.
    pub fn from_yaml(text: &str) -> Result<Kubeconfig, ConfigError> {
        kubeconfig_from_yaml(text)?
            .into_iter()
            .try_fold(Kubeconfig::default(), Kubeconfig::merge)
    }

    /// Merge kubeconfig file according to the rules described in
    /// <https://kubernetes.io/docs/concepts/configuration/organize-cluster-access-kubeconfig/#merging-kubeconfig-files>
    ///
    /// > - The first file to set a particular value or map key wins.
    /// > - Never change the value or map key.
    pub fn merge(mut self, next: Kubeconfig) -> Result<Self, ConfigError> {
        if self.kind.is_some() && next.kind.is_some() && self.kind != next.kind {
            return Err(ConfigError::KindMismatch);
        }
        if self.api_version.is_some() && next.api_version.is_some() && self.api_version != next.api_version {
            return Err(ConfigError::ApiVersionMismatch);
        }

        self.kind = self.kind.or(next.kind);
        self.api_version = self.api_version.or(next.api_version);
        let existing = self.contexts.iter().map(|c| c.name.clone()).collect::<HashSet<_>>();
        self.contexts
            .extend(next.contexts.into_iter().filter(|c| !existing.contains(&c.name)));
        self.current_context = self.current_context.or(next.current_context);
        Ok(self)
    }

    /// Find a context by name
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts
            .iter()
            .find(|named| named.name == name)
            .and_then(|named| named.context.as_ref())
    }
}

fn kubeconfig_from_yaml(text: &str) -> Result<Vec<Kubeconfig>, ConfigError> {
    let mut documents = vec![];
    for doc in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(doc).map_err(ConfigError::ParseYaml)?;
        if value.is_null() {
            continue;
        }
        let kubeconfig = serde_yaml::from_value(value).map_err(ConfigError::InvalidStructure)?;
        documents.push(kubeconfig);
    }
    Ok(documents)
}
