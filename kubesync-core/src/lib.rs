//! Crate with the client-less types shared by kubesync.
//!
//! It describes what a manifest *is* (its [`GroupKind`], name and declared namespace),
//! how manifests are keyed ([`ResourceId`]), and which kinds live in a namespace ([`Scope`]).
//! The same items are re-exported from `kubesync` under `kubesync::core`.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod gvk;
pub use gvk::{GroupKind, GroupVersion, GroupVersionKind};

pub mod id;
pub use id::{IdNamespace, ResourceId};

pub mod manifest;
pub use manifest::{ManifestSource, ResourceRecord};

pub mod scope;
pub use scope::Scope;

mod error;
pub use error::ManifestError;
