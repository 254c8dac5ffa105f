use super::{KubeconfigLocation, KubeconfigOptions};
use crate::error::ConfigError;

/// Namespace used when the selected kubeconfig context does not name one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Determines the namespace for manifests that declare none.
///
/// An explicit override always wins. Otherwise the namespace of the selected kubeconfig
/// context is used: the context named in [`KubeconfigOptions::context`], or `current-context`.
#[derive(Clone, Debug)]
pub struct FallbackResolver {
    location: KubeconfigLocation,
    options: KubeconfigOptions,
}

impl FallbackResolver {
    /// Resolve against the kubeconfig at `location`
    pub fn new(location: KubeconfigLocation) -> Self {
        Self::with_options(location, KubeconfigOptions::default())
    }

    /// Resolve against the kubeconfig at `location` with explicit options
    pub fn with_options(location: KubeconfigLocation, options: KubeconfigOptions) -> Self {
        Self { location, options }
    }

    /// The fallback namespace
    ///
    /// A non-empty `explicit_override` is returned unchanged without reading the kubeconfig.
    pub fn resolve(&self, explicit_override: Option<&str>) -> Result<String, ConfigError> {
        if let Some(ns) = explicit_override.filter(|ns| !ns.is_empty()) {
            tracing::debug!(namespace = ns, "using explicitly configured fallback namespace");
            return Ok(ns.to_string());
        }
        self.kubeconfig_namespace()
    }

    /// The namespace of the selected kubeconfig context
    ///
    /// A context without a namespace gives [`DEFAULT_NAMESPACE`], matching kubectl.
    pub fn kubeconfig_namespace(&self) -> Result<String, ConfigError> {
        let config = self.location.load()?;
        let context_name = match (&self.options.context, &config.current_context) {
            (Some(name), _) | (None, Some(name)) => name,
            (None, None) => return Err(ConfigError::CurrentContextNotSet),
        };
        let context = config.context(context_name).ok_or_else(|| ConfigError::LoadContext {
            context_name: context_name.clone(),
        })?;

        match context.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            Some(ns) => {
                tracing::debug!(
                    context = %context_name,
                    namespace = ns,
                    "using kubeconfig namespace as fallback"
                );
                Ok(ns.to_string())
            }
            None => {
                tracing::debug!(
                    context = %context_name,
                    "kubeconfig context sets no namespace, using {DEFAULT_NAMESPACE}"
                );
                Ok(DEFAULT_NAMESPACE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = "apiVersion: v1
clusters: []
contexts:
- context:
    cluster: cluster
    namespace: namespace
    user: user
  name: context
- context:
    cluster: cluster
    user: user
  name: bare
current-context: context
kind: Config
preferences: {}
users: []
";

    fn inline(text: &str) -> FallbackResolver {
        FallbackResolver::new(KubeconfigLocation::Inline(text.into()))
    }

    #[test]
    fn reads_current_context_namespace() {
        assert_eq!(inline(KUBECONFIG).resolve(None).unwrap(), "namespace");
        assert_eq!(inline(KUBECONFIG).resolve(Some("")).unwrap(), "namespace");
    }

    #[test]
    fn override_skips_kubeconfig() {
        // the location does not exist, so any read would fail
        let dir = tempfile::tempdir().unwrap();
        let resolver = FallbackResolver::new(KubeconfigLocation::path(dir.path().join("missing")));
        assert_eq!(resolver.resolve(Some("foo-override")).unwrap(), "foo-override");
        assert!(matches!(resolver.resolve(None), Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn context_option_replaces_current_context() {
        let options = KubeconfigOptions {
            context: Some("bare".into()),
        };
        let resolver = FallbackResolver::with_options(KubeconfigLocation::Inline(KUBECONFIG.into()), options);
        assert_eq!(resolver.resolve(None).unwrap(), DEFAULT_NAMESPACE);
    }

    #[test]
    fn context_without_namespace_uses_default() {
        let text = KUBECONFIG.replace("current-context: context", "current-context: bare");
        assert_eq!(inline(&text).resolve(None).unwrap(), "default");
    }

    #[test]
    fn missing_current_context_fails() {
        let text = KUBECONFIG.replace("current-context: context\n", "");
        assert!(matches!(
            inline(&text).resolve(None),
            Err(ConfigError::CurrentContextNotSet)
        ));
        assert!(matches!(inline("").resolve(None), Err(ConfigError::CurrentContextNotSet)));
    }

    #[test]
    fn unknown_current_context_fails() {
        let text = KUBECONFIG.replace("current-context: context", "current-context: gone");
        let err = inline(&text).resolve(None).unwrap_err();
        assert!(matches!(err, ConfigError::LoadContext { ref context_name } if context_name == "gone"));
    }

    #[test]
    fn unparseable_kubeconfig_fails() {
        assert!(matches!(
            inline("current-context: [").resolve(None),
            Err(ConfigError::ParseYaml(_))
        ));
    }
}
