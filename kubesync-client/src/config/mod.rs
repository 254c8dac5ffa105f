//! Configuration for namespace resolution: where the kubeconfig lives and how to read it.
//!
//! # Usage
//! Read the environment once at startup with [`KubeconfigLocation::from_env`], then hand the
//! location to a [`FallbackResolver`] or to [`Namespacer::from_config`](crate::Namespacer::from_config).
mod fallback;
mod file_config;

pub use fallback::{FallbackResolver, DEFAULT_NAMESPACE};
pub use file_config::{Context, Kubeconfig, NamedContext};

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, namespacer::UnknownScopePolicy};

const KUBECONFIG: &str = "KUBECONFIG";

/// Where to find the kubeconfig
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KubeconfigLocation {
    /// Files merged in order, as listed in `KUBECONFIG`
    Paths(Vec<PathBuf>),
    /// Kubeconfig YAML held in memory
    Inline(String),
}

impl KubeconfigLocation {
    /// A single kubeconfig file
    pub fn path<P: AsRef<Path>>(path: P) -> Self {
        Self::Paths(vec![path.as_ref().to_path_buf()])
    }

    /// Locate the kubeconfig from `KUBECONFIG`, falling back to `$HOME/.kube/config`
    ///
    /// This is the only place the environment is consulted; call it once at process start.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var_os(KUBECONFIG).as_deref(), default_kube_path())
    }

    fn from_env_value(value: Option<&OsStr>, default_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let paths = value
            .map(|v| {
                std::env::split_paths(v)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if !paths.is_empty() {
            return Ok(Self::Paths(paths));
        }
        default_path
            .map(|p| Self::Paths(vec![p]))
            .ok_or(ConfigError::NoKubeconfigPath)
    }

    /// Read and merge the kubeconfig at this location
    pub fn load(&self) -> Result<Kubeconfig, ConfigError> {
        match self {
            Self::Paths(paths) => paths.iter().try_fold(Kubeconfig::default(), |merged, path| {
                Kubeconfig::read_from(path).and_then(|next| merged.merge(next))
            }),
            Self::Inline(text) => Kubeconfig::from_yaml(text),
        }
    }
}

/// Returns kubeconfig path from `$HOME/.kube/config`.
fn default_kube_path() -> Option<PathBuf> {
    home::home_dir().map(|h| h.join(".kube").join("config"))
}

/// KubeconfigOptions stores options used when reading the kubeconfig.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct KubeconfigOptions {
    /// The named context to load instead of `current-context`
    pub context: Option<String>,
}

/// Settings for a sync run's [`Namespacer`](crate::Namespacer)
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespacerConfig {
    /// Namespace for manifests that declare none; overrides the kubeconfig when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,
    /// Kubeconfig context to read instead of `current-context`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// What to do with kinds whose scope cannot be determined
    #[serde(default)]
    pub unknown_scope: UnknownScopePolicy,
}

impl NamespacerConfig {
    /// The kubeconfig options implied by this config
    pub fn kubeconfig_options(&self) -> KubeconfigOptions {
        KubeconfigOptions {
            context: self.context.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn env_value_splits_path_list() {
        let joined = std::env::join_paths(["/a/config", "", "/b/config"]).unwrap();
        let location = KubeconfigLocation::from_env_value(Some(joined.as_os_str()), None).unwrap();
        assert_eq!(
            location,
            KubeconfigLocation::Paths(vec!["/a/config".into(), "/b/config".into()])
        );
    }

    #[test]
    fn unset_or_empty_env_uses_default_path() {
        let default = PathBuf::from("/home/me/.kube/config");
        let expected = KubeconfigLocation::path(&default);
        assert_eq!(
            KubeconfigLocation::from_env_value(None, Some(default.clone())).unwrap(),
            expected
        );
        assert_eq!(
            KubeconfigLocation::from_env_value(Some(OsString::new().as_os_str()), Some(default)).unwrap(),
            expected
        );
        assert!(matches!(
            KubeconfigLocation::from_env_value(None, None),
            Err(ConfigError::NoKubeconfigPath)
        ));
    }

    #[test]
    fn load_merges_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::write(&first, "contexts:\n- name: a\n  context:\n    namespace: from-first\n").unwrap();
        std::fs::write(
            &second,
            "current-context: a\ncontexts:\n- name: a\n  context:\n    namespace: from-second\n",
        )
        .unwrap();

        let config = KubeconfigLocation::Paths(vec![first, second]).load().unwrap();
        assert_eq!(config.current_context.as_deref(), Some("a"));
        assert_eq!(
            config.context("a").and_then(|c| c.namespace.as_deref()),
            Some("from-first")
        );
    }

    #[test]
    fn load_reports_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = KubeconfigLocation::path(&missing).load().unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { path, .. } if path == missing));
    }

    #[test]
    fn namespacer_config_deserializes_camel_case() {
        let config: NamespacerConfig = serde_json::from_value(serde_json::json!({
            "defaultNamespace": "flux",
            "unknownScope": "assumeNamespaced",
        }))
        .unwrap();
        assert_eq!(config.default_namespace.as_deref(), Some("flux"));
        assert_eq!(config.context, None);
        assert_eq!(config.unknown_scope, UnknownScopePolicy::AssumeNamespaced);

        let empty: NamespacerConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty, NamespacerConfig::default());
        assert_eq!(empty.unknown_scope, UnknownScopePolicy::Reject);
    }
}
