//! Provider registry.
//!
//! Maps a (provider, theme) pair to a [`ProviderDescriptor`]. The registry is
//! built once from a [`RegistryConfig`] at startup and never mutated; share
//! it behind an `Arc`.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::coord::{ProviderId, ThemeMode, TileScheme};

use super::template::{has_blank_credential, inject_credential};
use super::types::{ProviderDescriptor, ProviderSummary};

/// Name of the built-in MapTiler provider.
pub const MAPTILER: &str = "maptiler";

/// Query parameter most origins use for API keys.
pub const DEFAULT_CREDENTIAL_PARAM: &str = "key";

/// Errors raised by registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No descriptor for this provider, or the provider lacks this theme.
    #[error("Unknown provider '{provider}' for theme '{theme}'")]
    UnknownProvider {
        provider: ProviderId,
        theme: ThemeMode,
    },
}

/// Configuration for one tile origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDefinition {
    pub name: ProviderId,
    pub base_url: String,
    /// URL template per theme. A theme without a template is unsupported.
    pub templates: BTreeMap<ThemeMode, String>,
    /// Credential substituted for `{key}`; `None` leaves the parameter blank.
    pub credential: Option<String>,
    /// Query parameter name checked for a blank credential before fetching.
    pub credential_param: Option<String>,
    pub scheme: TileScheme,
}

impl ProviderDefinition {
    /// Create a definition with no templates yet.
    pub fn new(name: impl AsRef<str>, base_url: impl Into<String>) -> Self {
        Self {
            name: ProviderId::new(name),
            base_url: base_url.into(),
            templates: BTreeMap::new(),
            credential: None,
            credential_param: Some(DEFAULT_CREDENTIAL_PARAM.to_string()),
            scheme: TileScheme::Xyz,
        }
    }

    /// The built-in MapTiler streets definition (dark and light).
    pub fn maptiler(api_key: Option<String>) -> Self {
        Self::new(MAPTILER, "https://api.maptiler.com/maps/")
            .with_template(
                ThemeMode::Dark,
                "https://api.maptiler.com/maps/streets-v2-dark/{z}/{x}/{y}@2x.png?key={key}",
            )
            .with_template(
                ThemeMode::Light,
                "https://api.maptiler.com/maps/streets-v2/{z}/{x}/{y}@2x.png?key={key}",
            )
            .with_credential(api_key)
    }

    pub fn with_template(mut self, theme: ThemeMode, template: impl Into<String>) -> Self {
        self.templates.insert(theme, template.into());
        self
    }

    /// Set the credential. Blank strings count as absent.
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    pub fn with_credential_param(mut self, param: Option<String>) -> Self {
        self.credential_param = param;
        self
    }

    pub fn with_scheme(mut self, scheme: TileScheme) -> Self {
        self.scheme = scheme;
        self
    }
}

/// Set of provider definitions the registry is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub providers: Vec<ProviderDefinition>,
}

impl RegistryConfig {
    pub fn new(providers: Vec<ProviderDefinition>) -> Self {
        Self { providers }
    }

    /// Add or replace a definition by name.
    pub fn upsert(&mut self, definition: ProviderDefinition) {
        match self.providers.iter_mut().find(|p| p.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.providers.push(definition),
        }
    }

    pub fn get(&self, name: &ProviderId) -> Option<&ProviderDefinition> {
        self.providers.iter().find(|p| &p.name == name)
    }
}

impl Default for RegistryConfig {
    /// The built-in providers, without credentials.
    fn default() -> Self {
        Self::new(vec![ProviderDefinition::maptiler(None)])
    }
}

/// How a descriptor's template is missing its credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlankCredential {
    /// The guarded parameter is blank; fetches are refused.
    Guarded,
    /// No parameter is guarded but the template still carries a blank
    /// `key=`, so fetches would go out without a credential.
    Unguarded,
}

fn blank_credential(descriptor: &ProviderDescriptor) -> Option<BlankCredential> {
    match descriptor.credential_param.as_deref() {
        Some(param) => has_blank_credential(&descriptor.url_template, param)
            .then_some(BlankCredential::Guarded),
        None => has_blank_credential(&descriptor.url_template, DEFAULT_CREDENTIAL_PARAM)
            .then_some(BlankCredential::Unguarded),
    }
}

/// Immutable lookup table from (provider, theme) to origin descriptor.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    descriptors: BTreeMap<(ProviderId, ThemeMode), ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Build the registry, injecting credentials into every template.
    ///
    /// Never fails: a provider whose credential is missing is still
    /// registered, and is rejected at fetch time instead.
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut descriptors = BTreeMap::new();

        for definition in &config.providers {
            if !definition.name.is_key_segment() {
                warn!(provider = %definition.name, "Skipping provider with unusable name");
                continue;
            }
            for (theme, template) in &definition.templates {
                let url_template = inject_credential(template, definition.credential.as_deref());
                let descriptor = ProviderDescriptor {
                    name: definition.name.clone(),
                    theme: *theme,
                    base_url: definition.base_url.clone(),
                    url_template,
                    scheme: definition.scheme,
                    credential_param: definition.credential_param.clone(),
                };

                match blank_credential(&descriptor) {
                    Some(BlankCredential::Guarded) => warn!(
                        provider = %definition.name,
                        theme = %theme,
                        "Provider credential missing; requests will fail until configured"
                    ),
                    Some(BlankCredential::Unguarded) => warn!(
                        provider = %definition.name,
                        theme = %theme,
                        param = DEFAULT_CREDENTIAL_PARAM,
                        "Template sends a blank credential and credential_param is disabled"
                    ),
                    None => {}
                }

                descriptors.insert((definition.name.clone(), *theme), descriptor);
            }
        }

        info!(entries = descriptors.len(), "Provider registry loaded");
        Self { descriptors }
    }

    /// Look up the descriptor for a provider and theme.
    ///
    /// Matching is exact on the normalised id; there is no prefix or fuzzy
    /// matching.
    pub fn resolve(
        &self,
        provider: &ProviderId,
        theme: ThemeMode,
    ) -> Result<&ProviderDescriptor, RegistryError> {
        self.descriptors
            .get(&(provider.clone(), theme))
            .ok_or_else(|| RegistryError::UnknownProvider {
                provider: provider.clone(),
                theme,
            })
    }

    /// True if the provider is registered for at least one theme.
    pub fn contains(&self, provider: &ProviderId) -> bool {
        self.descriptors.keys().any(|(name, _)| name == provider)
    }

    /// All descriptors, ordered by provider then theme.
    pub fn descriptors(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.descriptors.values()
    }

    /// Credential-free listing for display.
    pub fn summaries(&self) -> Vec<ProviderSummary> {
        self.descriptors().map(ProviderDescriptor::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
