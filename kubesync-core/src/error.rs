//! Errors raised while turning manifest text into records.
use std::path::PathBuf;

use thiserror::Error;

use crate::{gvk::ParseGroupVersionError, id::ResourceId, manifest::ManifestSource};

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when parsing manifests
pub enum ManifestError {
    #[error("Failed to read manifests from '{path:?}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML document in {origin}: {source}")]
    ParseYaml {
        origin: ManifestSource,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML document in {origin} is not an object")]
    NotAnObject { origin: ManifestSource },

    #[error("Unexpected structure of document in {origin}: {source}")]
    InvalidStructure {
        origin: ManifestSource,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document in {origin} has no kind")]
    MissingKind { origin: ManifestSource },

    #[error("{kind} in {origin} has no apiVersion")]
    MissingApiVersion { origin: ManifestSource, kind: String },

    #[error("Invalid apiVersion in {origin}: {source}")]
    InvalidApiVersion {
        origin: ManifestSource,
        #[source]
        source: ParseGroupVersionError,
    },

    #[error("{kind} in {origin} has no metadata.name")]
    MissingName { origin: ManifestSource, kind: String },

    #[error("Duplicate definition of '{id}' (in {first} and {second})")]
    Duplicate {
        id: ResourceId,
        first: ManifestSource,
        second: ManifestSource,
    },
}
