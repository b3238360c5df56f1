//! Registry mapping versioning schemes to the comparator that parses and orders their versions.

use crate::schemes::{
    APK_SCHEME, DEB_SCHEME, GENERIC_SCHEME, GOLANG_SCHEME, MAVEN_SCHEME, NPM_SCHEME, PYPI_SCHEME,
    RPM_SCHEME, SEMVER_SCHEME, VersionKind,
};
use crate::{VersError, Version};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

/// Builds a [`Version`] for `(scheme, text)`.
pub type VersionConstructor = dyn Fn(&str, &str) -> Result<Version, VersError> + Send + Sync;

/// Priority of a provider that should only be used when nothing else claims a scheme.
pub const PRIORITY_LOWEST: i32 = 0;
/// Priority of the providers shipped with this crate.
pub const PRIORITY_BUILTIN: i32 = 50;
/// Priority of a provider that must win over every other one.
pub const PRIORITY_HIGHEST: i32 = i32::MAX;

/// A comparator implementation registered for one or more schemes.
#[derive(Clone)]
pub struct VersionProvider {
    name: String,
    schemes: Vec<String>,
    priority: i32,
    constructor: Arc<VersionConstructor>,
}

impl VersionProvider {
    /// Creates a provider serving `schemes`.
    ///
    /// The constructor receives the scheme that was requested, which is not necessarily one of
    /// `schemes` when the provider acts as the generic fallback, and must tag the returned
    /// [`Version`] with it.
    pub fn new<F>(
        name: impl Into<String>,
        schemes: impl IntoIterator<Item = impl Into<String>>,
        priority: i32,
        constructor: F,
    ) -> Self
    where
        F: Fn(&str, &str) -> Result<Version, VersError> + Send + Sync + 'static,
    {
        VersionProvider {
            name: name.into(),
            schemes: schemes.into_iter().map(Into::into).collect(),
            priority,
            constructor: Arc::new(constructor),
        }
    }

    fn builtin(
        name: &str,
        schemes: &[&str],
        parse: fn(&str) -> Result<VersionKind, VersError>,
    ) -> Self {
        VersionProvider::new(
            name,
            schemes.iter().copied(),
            PRIORITY_BUILTIN,
            move |scheme: &str, text: &str| {
                let kind = parse(text).map_err(|e| e.with_scheme(scheme))?;
                Ok(Version::new(scheme, text, kind))
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn supports(&self, scheme: &str) -> bool {
        self.schemes.iter().any(|s| s == scheme)
    }

    /// Parses `text` as a version of `scheme`.
    pub fn version(&self, scheme: &str, text: &str) -> Result<Version, VersError> {
        (self.constructor)(scheme, text)
    }
}

impl fmt::Debug for VersionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionProvider")
            .field("name", &self.name)
            .field("schemes", &self.schemes)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

fn builtin_providers() -> Vec<VersionProvider> {
    vec![
        VersionProvider::builtin("alpine", &[APK_SCHEME], |s| {
            s.parse().map(VersionKind::Alpine)
        }),
        VersionProvider::builtin("debian", &[DEB_SCHEME], |s| s.parse().map(VersionKind::Deb)),
        VersionProvider::builtin("generic", &[GENERIC_SCHEME], |s| {
            s.parse().map(VersionKind::Generic)
        }),
        VersionProvider::builtin("go", &[GOLANG_SCHEME], |s| s.parse().map(VersionKind::Go)),
        VersionProvider::builtin("maven", &[MAVEN_SCHEME], |s| {
            s.parse().map(VersionKind::Maven)
        }),
        VersionProvider::builtin("npm", &[NPM_SCHEME, SEMVER_SCHEME], |s| {
            s.parse().map(VersionKind::Npm)
        }),
        VersionProvider::builtin("python", &[PYPI_SCHEME], |s| {
            s.parse().map(VersionKind::Python)
        }),
        VersionProvider::builtin("rpm", &[RPM_SCHEME], |s| s.parse().map(VersionKind::Rpm)),
    ]
}

/// Selects the provider for each scheme and creates versions through it.
///
/// For every scheme the registered provider with the highest priority wins; among equal
/// priorities the one registered first. Schemes nobody claims are served by whichever provider
/// claims `generic`, with the requested scheme kept on the resulting [`Version`].
///
/// ```
/// use vers_range::VersionFactory;
///
/// let v = VersionFactory::global().version("cargo", "1.2.3").unwrap();
/// assert_eq!(v.scheme(), "cargo");
/// assert_eq!(v.kind().name(), "generic");
/// ```
pub struct VersionFactory {
    registry: RwLock<Registry>,
}

/// Registered providers and the selection made from them for each scheme so far.
///
/// Both live under one lock so a selection is never cached against an outdated provider list.
#[derive(Debug, Default)]
struct Registry {
    providers: Vec<Arc<VersionProvider>>,
    resolved: HashMap<String, Option<Arc<VersionProvider>>>,
}

impl Registry {
    fn select(&self, scheme: &str) -> Option<Arc<VersionProvider>> {
        self.providers
            .iter()
            .filter(|p| p.supports(scheme))
            // `max_by_key` keeps the last maximum, so scan newest first.
            .rev()
            .max_by_key(|p| p.priority())
            .cloned()
    }
}

static GLOBAL: LazyLock<VersionFactory> = LazyLock::new(VersionFactory::new);

impl VersionFactory {
    /// A registry holding the built-in providers.
    pub fn new() -> Self {
        let factory = VersionFactory::empty();
        for provider in builtin_providers() {
            factory.register(provider);
        }
        factory
    }

    /// A registry without any provider.
    pub fn empty() -> Self {
        VersionFactory {
            registry: RwLock::new(Registry::default()),
        }
    }

    /// The process-wide registry used by parsing and the range builder.
    pub fn global() -> &'static VersionFactory {
        &GLOBAL
    }

    pub fn register(&self, provider: VersionProvider) {
        debug!(
            provider = provider.name(),
            schemes = ?provider.schemes(),
            priority = provider.priority(),
            "registering version provider"
        );
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        registry.providers.push(Arc::new(provider));
        registry.resolved.clear();
    }

    /// The provider that would serve `scheme`, ignoring the generic fallback.
    pub fn provider(&self, scheme: &str) -> Option<Arc<VersionProvider>> {
        if let Some(cached) = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .resolved
            .get(scheme)
        {
            return cached.clone();
        }

        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = registry.resolved.get(scheme) {
            return cached.clone();
        }
        let selected = registry.select(scheme);
        if let Some(provider) = &selected {
            debug!(
                scheme,
                provider = provider.name(),
                priority = provider.priority(),
                "resolved version provider"
            );
        }
        registry
            .resolved
            .insert(scheme.to_string(), selected.clone());
        selected
    }

    /// Parses `text` as a version of `scheme`.
    pub fn version(&self, scheme: &str, text: &str) -> Result<Version, VersError> {
        if let Some(provider) = self.provider(scheme) {
            return provider.version(scheme, text);
        }

        if scheme != GENERIC_SCHEME
            && let Some(generic) = self.provider(GENERIC_SCHEME)
        {
            debug!(
                scheme,
                provider = generic.name(),
                "no provider for scheme, falling back to generic"
            );
            return generic.version(scheme, text);
        }

        Err(VersError::UnsupportedScheme(scheme.to_string()))
    }
}

impl Default for VersionFactory {
    fn default() -> Self {
        VersionFactory::new()
    }
}

impl fmt::Debug for VersionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionFactory")
            .field(
                "providers",
                &self
                    .registry
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .providers,
            )
            .finish_non_exhaustive()
    }
}
