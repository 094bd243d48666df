//! Device Type Catalog

use std::sync::Arc;

use shared::models::{DeviceType, DeviceTypeCreate};
use shared::util::snowflake_id;

use crate::db::DeviceTypeStore;
use crate::pricing::{PricingError, PricingResult};

#[derive(Clone)]
pub struct DeviceTypeCatalog {
    store: Arc<dyn DeviceTypeStore>,
}

impl DeviceTypeCatalog {
    pub fn new(store: Arc<dyn DeviceTypeStore>) -> Self {
        Self { store }
    }

    /// Register a device type; the id is generated when absent or blank
    pub async fn register(&self, data: DeviceTypeCreate) -> PricingResult<DeviceType> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(PricingError::Validation("name must not be blank".into()));
        }

        let id = match data.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => snowflake_id().to_string(),
        };
        let code = data
            .code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let device_type = self
            .store
            .insert_device_type(DeviceType {
                id,
                code,
                name: name.to_string(),
            })
            .await?;

        tracing::info!(
            device_type_id = %device_type.id,
            code = ?device_type.code,
            name = %device_type.name,
            "Device type registered"
        );
        Ok(device_type)
    }

    pub async fn list(&self) -> PricingResult<Vec<DeviceType>> {
        Ok(self.store.list_device_types().await?)
    }
}
