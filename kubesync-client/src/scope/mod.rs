//! Answers to "does this kind live in a namespace?".
//!
//! A [`ScopingOracle`] is consulted by the [`Namespacer`](crate::Namespacer) for every record.
//! Answers must not change during a sync run, so every implementation here is a frozen table:
//!
//! - [`DiscoveryScopes`]: snapshot of the cluster's API discovery
//! - [`ManifestScopes`]: scopes declared by `CustomResourceDefinition`s in the manifest set
//! - [`StaticScopes`]: a fixed set of namespaced kinds, everything else cluster-scoped
use std::sync::Arc;

use kubesync_core::{GroupKind, Scope};

mod discovery;
mod manifest;
mod static_scopes;

pub use discovery::DiscoveryScopes;
pub use manifest::ManifestScopes;
pub use static_scopes::StaticScopes;

/// Classifies kinds as namespaced or cluster-scoped
pub trait ScopingOracle: Send + Sync {
    /// The scope of `gk`, or `None` if this oracle cannot tell
    fn scope_of(&self, gk: &GroupKind) -> Option<Scope>;

    /// Whether `gk` is namespaced, or `None` if this oracle cannot tell
    fn is_namespaced(&self, gk: &GroupKind) -> Option<bool> {
        self.scope_of(gk).map(Scope::is_namespaced)
    }
}

impl<T: ScopingOracle + ?Sized> ScopingOracle for &T {
    fn scope_of(&self, gk: &GroupKind) -> Option<Scope> {
        (**self).scope_of(gk)
    }
}

impl<T: ScopingOracle + ?Sized> ScopingOracle for Arc<T> {
    fn scope_of(&self, gk: &GroupKind) -> Option<Scope> {
        (**self).scope_of(gk)
    }
}

impl<T: ScopingOracle + ?Sized> ScopingOracle for Box<T> {
    fn scope_of(&self, gk: &GroupKind) -> Option<Scope> {
        (**self).scope_of(gk)
    }
}
