use crate::error::Result;
use crate::npm::{NpmConfig, NpmRegistry};
use crate::registry::RegistryClient;
use std::sync::Arc;

pub struct RegistryFactory;

impl RegistryFactory {
    pub fn create_npm(config: &NpmConfig) -> Result<Arc<dyn RegistryClient>> {
        let client = NpmRegistry::new(&config.registry)?;
        Ok(Arc::new(client))
    }
}
