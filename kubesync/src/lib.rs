//! Kubesync is an umbrella-crate for resolving where Kubernetes manifests belong.
//!
//! # Overview
//!
//! A GitOps sync engine reads manifests that often leave out `metadata.namespace`, and may
//! even set it on kinds that live outside any namespace. Before diffing or applying, every
//! manifest has to be pinned to exactly one namespace, or to none for cluster-scoped kinds.
//!
//! The main modules are:
//!
//! - [`core`] with [`GroupKind`](crate::core::GroupKind), [`ResourceId`](crate::core::ResourceId)
//!   and the multi-document [`manifest`](crate::core::manifest) parser
//! - [`config`] for the kubeconfig and the [`FallbackResolver`]
//! - [`scope`] with the [`ScopingOracle`] implementations
//! - [`Namespacer`] which combines them
//!
//! # Resolving namespaces
//!
//! ```no_run
//! use kubesync::{core::manifest, scope::DiscoveryScopes, KubeconfigLocation, Namespacer, NamespacerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Snapshot of discovery taken at the start of the sync run
//!     let scopes = DiscoveryScopes::new();
//!     let location = KubeconfigLocation::from_env()?;
//!     let namespacer = Namespacer::from_config(scopes, &NamespacerConfig::default(), &location)?;
//!
//!     let manifests = manifest::load("./deploy")?;
//!     let crds = kubesync::ManifestScopes::from_records(manifests.values());
//!     for record in manifests.values() {
//!         println!("{}", namespacer.resource_id_with(record, &crds)?);
//!     }
//!     Ok(())
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

macro_rules! cfg_client {
    ($($item:item)*) => {
        $(
            #[cfg_attr(docsrs, doc(cfg(feature = "client")))]
            #[cfg(feature = "client")]
            $item
        )*
    }
}

cfg_client! {
    pub use kubesync_client::config;
    pub use kubesync_client::error;
    pub use kubesync_client::scope;
    #[doc(inline)]
    pub use kubesync_client::{
        ConfigError, Error, FallbackResolver, KubeconfigLocation, KubeconfigOptions, ManifestScopes,
        Namespacer, NamespacerConfig, Result, ScopingOracle, UnknownScopeError, UnknownScopePolicy,
    };
}

/// Re-exports from kubesync-core
pub mod core {
    pub use kubesync_core::*;
}
