use crate::{LoginFormError, ProviderClient, ProviderDefinition, ProviderSettings};

type ClientFactory =
    Box<dyn Fn(&ProviderSettings) -> Result<Box<dyn ProviderClient>, LoginFormError> + Send + Sync>;

struct Entry {
    definition: ProviderDefinition,
    factory: ClientFactory,
}

/// Providers known to the deployment, assembled once at startup and looked up
/// by id at request time. Iteration preserves registration order so the
/// rendered form is stable.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<Entry>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, definition: ProviderDefinition, factory: F)
    where
        F: Fn(&ProviderSettings) -> Result<Box<dyn ProviderClient>, LoginFormError>
            + Send
            + Sync
            + 'static,
    {
        tracing::debug!(provider = %definition.id, enabled = definition.enabled, "registering provider");
        self.entries.retain(|entry| entry.definition.id != definition.id);
        self.entries.push(Entry {
            definition,
            factory: Box::new(factory),
        });
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ProviderDefinition> {
        self.entries.iter().map(|entry| &entry.definition)
    }

    pub fn definition(&self, provider_id: &str) -> Result<&ProviderDefinition, LoginFormError> {
        self.entry(provider_id).map(|entry| &entry.definition)
    }

    /// Instantiates a client for the provider from its stored settings.
    pub fn client(&self, provider_id: &str) -> Result<Box<dyn ProviderClient>, LoginFormError> {
        let entry = self.entry(provider_id)?;
        (entry.factory)(&entry.definition.settings)
    }

    fn entry(&self, provider_id: &str) -> Result<&Entry, LoginFormError> {
        self.entries
            .iter()
            .find(|entry| entry.definition.id == provider_id)
            .ok_or_else(|| LoginFormError::UnknownProvider(provider_id.to_string()))
    }
}
