//! Error handling in [`kubesync-client`][crate]
use std::path::PathBuf;

use kubesync_core::{GroupKind, ManifestError};
use thiserror::Error;

/// Possible errors when working with [`kubesync-client`][crate]
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Error loading kubeconfig: {0}")]
    Kubeconfig(#[from] ConfigError),

    /// A kind could not be classified as namespaced or cluster-scoped
    #[error(transparent)]
    UnknownScope(#[from] UnknownScopeError),

    /// Manifests could not be parsed
    #[error("Error loading manifests: {0}")]
    Manifest(#[from] ManifestError),

    /// Discovery errors
    #[error("Error from discovery: {0}")]
    Discovery(#[from] DiscoveryError),
}

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when determining the fallback namespace
pub enum ConfigError {
    #[error("Failed to determine current context")]
    CurrentContextNotSet,

    #[error("Unable to load current context: {context_name}")]
    LoadContext { context_name: String },

    #[error("Merging kubeconfig with mismatching kind")]
    KindMismatch,
    #[error("Merging kubeconfig with mismatching apiVersion")]
    ApiVersionMismatch,

    #[error("Unable to find path of kubeconfig")]
    NoKubeconfigPath,

    #[error("Failed to read '{path:?}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse Kubeconfig YAML: {0}")]
    ParseYaml(#[source] serde_yaml::Error),

    #[error("Failed to deserialize YAML into Kubeconfig: {0}")]
    InvalidStructure(#[source] serde_yaml::Error),
}

/// The scope of a kind is known neither to discovery nor to the manifest set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unable to determine whether {group_kind} is namespaced")]
pub struct UnknownScopeError {
    /// The unclassified kind
    pub group_kind: GroupKind,
}

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when building a scope snapshot from discovery
pub enum DiscoveryError {
    #[error("Invalid GroupVersion: {0}")]
    InvalidGroupVersion(String),
}
