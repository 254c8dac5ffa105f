//! Parsed manifest documents and the multi-document loader that produces them.
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::ManifestError,
    gvk::{GroupKind, GroupVersion, GroupVersionKind},
    id::ResourceId,
};

/// Where a manifest document came from, for diagnostics only
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ManifestSource {
    /// Read from a file
    File(PathBuf),
    /// Parsed from an in-memory string
    Inline,
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::File(path) => write!(f, "{}", path.display()),
            ManifestSource::Inline => f.write_str("<string>"),
        }
    }
}

/// The parsed identity of one manifest document
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    /// Type identity
    pub group_kind: GroupKind,
    /// Version the manifest was written against
    pub version: String,
    /// Kind-local name
    pub name: String,
    /// Namespace declared in `metadata.namespace`, if any
    pub namespace: Option<String>,
    /// Origin of the document
    pub source: ManifestSource,
    /// The whole document
    pub data: serde_json::Value,
}

impl ResourceRecord {
    /// Create a record with minimal values set, as if parsed from an inline manifest.
    #[must_use]
    pub fn new(gvk: &GroupVersionKind, name: &str) -> Self {
        Self {
            group_kind: gvk.group_kind(),
            version: gvk.version.clone(),
            name: name.into(),
            namespace: None,
            source: ManifestSource::Inline,
            data: serde_json::Value::Null,
        }
    }

    /// Attach a declared namespace
    #[must_use]
    pub fn within(mut self, ns: &str) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    /// Attach the raw document
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// The declared namespace, treating an empty string as undeclared
    pub fn declared_namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// Pre-resolution id of this record
    pub fn id(&self) -> ResourceId {
        ResourceId::declared(self)
    }
}

/// The fields of a document needed to identify it
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PartialManifest {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: PartialMeta,
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Default)]
struct PartialMeta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
}

/// Parse every YAML document in `bytes` into records keyed by their pre-resolution id.
///
/// Empty documents are skipped and `List` kinds are expanded into their items.
pub fn parse_multidoc(
    bytes: &[u8],
    origin: ManifestSource,
) -> Result<BTreeMap<ResourceId, ResourceRecord>, ManifestError> {
    let mut records = BTreeMap::new();
    for doc in serde_yaml::Deserializer::from_slice(bytes) {
        let value = serde_json::Value::deserialize(doc).map_err(|source| ManifestError::ParseYaml {
            origin: origin.clone(),
            source,
        })?;
        collect(value, &origin, &mut records)?;
    }
    Ok(records)
}

fn collect(
    value: serde_json::Value,
    origin: &ManifestSource,
    records: &mut BTreeMap<ResourceId, ResourceRecord>,
) -> Result<(), ManifestError> {
    if value.is_null() {
        return Ok(());
    }
    if !value.is_object() {
        return Err(ManifestError::NotAnObject { origin: origin.clone() });
    }
    let partial = PartialManifest::deserialize(&value).map_err(|source| ManifestError::InvalidStructure {
        origin: origin.clone(),
        source,
    })?;

    let kind = partial
        .kind
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ManifestError::MissingKind { origin: origin.clone() })?;
    if kind.ends_with("List") {
        if let Some(items) = partial.items {
            for item in items {
                collect(item, origin, records)?;
            }
            return Ok(());
        }
    }

    let api_version = partial
        .api_version
        .ok_or_else(|| ManifestError::MissingApiVersion {
            origin: origin.clone(),
            kind: kind.clone(),
        })?;
    let gv: GroupVersion = api_version
        .parse()
        .map_err(|source| ManifestError::InvalidApiVersion {
            origin: origin.clone(),
            source,
        })?;
    let name = partial
        .metadata
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ManifestError::MissingName {
            origin: origin.clone(),
            kind: kind.clone(),
        })?;

    let gvk = gv.with_kind(&kind);
    let record = ResourceRecord {
        group_kind: gvk.group_kind(),
        version: gvk.version,
        name,
        namespace: partial.metadata.namespace,
        source: origin.clone(),
        data: value,
    };
    insert(records, record)
}

fn insert(
    records: &mut BTreeMap<ResourceId, ResourceRecord>,
    record: ResourceRecord,
) -> Result<(), ManifestError> {
    let id = record.id();
    if let Some(existing) = records.get(&id) {
        return Err(ManifestError::Duplicate {
            id,
            first: existing.source.clone(),
            second: record.source,
        });
    }
    records.insert(id, record);
    Ok(())
}

/// Load manifests from a file, or from every `.yaml`/`.yml` file below a directory.
///
/// Files are visited in sorted order. A resource defined twice anywhere in the set is an error.
pub fn load<P: AsRef<Path>>(path: P) -> Result<BTreeMap<ResourceId, ResourceRecord>, ManifestError> {
    let mut files = vec![];
    find_manifest_files(path.as_ref(), &mut files)?;
    files.sort();

    let mut records = BTreeMap::new();
    for file in files {
        let bytes = fs::read(&file).map_err(|source| ManifestError::ReadFile {
            path: file.clone(),
            source,
        })?;
        let parsed = parse_multidoc(&bytes, ManifestSource::File(file.clone()))?;
        tracing::debug!(path = %file.display(), resources = parsed.len(), "loaded manifests");
        for record in parsed.into_values() {
            insert(&mut records, record)?;
        }
    }
    Ok(records)
}

fn find_manifest_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), ManifestError> {
    let read_err = |source: std::io::Error| ManifestError::ReadFile {
        path: path.into(),
        source,
    };
    if !path.is_dir() {
        // an explicitly named file is loaded whatever its extension
        fs::metadata(path).map_err(read_err)?;
        files.push(path.into());
        return Ok(());
    }
    for entry in fs::read_dir(path).map_err(read_err)? {
        let entry_path = entry.map_err(read_err)?.path();
        if entry_path.is_dir() {
            find_manifest_files(&entry_path, files)?;
        } else if is_manifest_file(&entry_path) {
            files.push(entry_path);
        }
    }
    Ok(())
}

fn is_manifest_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
