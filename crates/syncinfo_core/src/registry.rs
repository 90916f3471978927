//! Process-wide provider registry.

use crate::error::{SipError, SipResult};
use crate::provider::SipProvider;
use std::sync::Arc;
use syncinfo_types::{ProviderInfo, StageType};

/// Registry of the providers a process exposes.
///
/// Built once at startup and read-only afterwards, so lookups take no locks.
pub struct ProviderRegistry {
    providers: Vec<Arc<SipProvider>>,
}

impl ProviderRegistry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            providers: Vec::new(),
        }
    }

    /// Finds a provider by name and optional instance.
    pub fn find(&self, provider_type: &str, instance: Option<&str>) -> Option<Arc<SipProvider>> {
        self.providers
            .iter()
            .find(|provider| {
                let id = provider.id();
                id.provider_type == provider_type && id.instance.as_deref() == instance
            })
            .map(Arc::clone)
    }

    /// Finds a provider by the data type it describes and a stage type it
    /// carries.
    pub fn find_by_type(
        &self,
        data_type: &str,
        stage_type: StageType,
        instance: Option<&str>,
    ) -> Option<Arc<SipProvider>> {
        self.providers
            .iter()
            .find(|provider| {
                let id = provider.id();
                id.data_type == data_type
                    && id.instance.as_deref() == instance
                    && provider
                        .stages()
                        .iter()
                        .any(|stage| stage.stage_type == stage_type)
            })
            .map(Arc::clone)
    }

    /// Summaries of all registered providers, in registration order.
    pub fn list(&self) -> Vec<ProviderInfo> {
        self.providers.iter().map(|p| p.info()).collect()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Builder for [`ProviderRegistry`].
pub struct RegistryBuilder {
    providers: Vec<Arc<SipProvider>>,
}

impl RegistryBuilder {
    /// Registers a provider.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a provider with the same `(provider_type,
    /// instance)` is already registered.
    pub fn register(mut self, provider: SipProvider) -> SipResult<Self> {
        let id = provider.id();
        let duplicate = self.providers.iter().any(|existing| {
            let eid = existing.id();
            eid.provider_type == id.provider_type && eid.instance == id.instance
        });
        if duplicate {
            return Err(SipError::invalid_argument(format!(
                "provider {id} already registered"
            )));
        }
        self.providers.push(Arc::new(provider));
        Ok(self)
    }

    /// Finishes the registry.
    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            providers: self.providers,
        }
    }
}
