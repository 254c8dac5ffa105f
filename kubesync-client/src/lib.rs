//! Crate for deciding which namespace a manifest is synced into.
//!
//! A manifest may omit `metadata.namespace`, and cluster-scoped kinds must never get one.
//! The [`Namespacer`] settles both: it asks a [`ScopingOracle`] whether a kind is namespaced,
//! keeps a declared namespace when there is one, and otherwise uses a fallback namespace
//! taken from explicit configuration or from the active kubeconfig context.
//!
//! # Example
//!
//! ```rust,no_run
//! use kubesync_client::{KubeconfigLocation, Namespacer, NamespacerConfig, StaticScopes};
//! use kubesync_core::{manifest, GroupKind, ManifestSource};
//!
//! fn main() -> Result<(), kubesync_client::Error> {
//!     // Read the environment once to find the kubeconfig.
//!     let location = KubeconfigLocation::from_env()?;
//!     let scopes = StaticScopes::new([GroupKind::gk("apps", "Deployment")]);
//!     let namespacer = Namespacer::from_config(scopes, &NamespacerConfig::default(), &location)?;
//!
//!     let text = "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: app\n";
//!     let manifests = manifest::parse_multidoc(text.as_bytes(), ManifestSource::Inline)?;
//!     for record in manifests.values() {
//!         println!("{} -> {}", record.id(), namespacer.resource_id(record)?);
//!     }
//!     Ok(())
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
#[doc(inline)]
pub use config::{FallbackResolver, KubeconfigLocation, KubeconfigOptions, NamespacerConfig};

pub mod error;
#[doc(inline)]
pub use error::{ConfigError, DiscoveryError, Error, UnknownScopeError};

mod namespacer;
pub use namespacer::{Namespacer, UnknownScopePolicy};

pub mod scope;
pub use scope::{DiscoveryScopes, ManifestScopes, ScopingOracle, StaticScopes};

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
