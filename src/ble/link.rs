//! Radio link abstraction.
//!
//! The connection manager and device logic are written against the
//! [`RadioLink`] trait so they can be exercised without hardware; [`BleLink`]
//! is the production implementation over a btleplug peripheral.

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _, WriteType};
use btleplug::platform::Peripheral;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Transport operations the core needs from a physical link.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RadioLink: Send + Sync + 'static {
    /// Open the physical link.
    async fn connect(&self) -> Result<()>;

    /// Close the physical link.
    async fn disconnect(&self) -> Result<()>;

    /// Read the value of a characteristic.
    async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>>;

    /// Write to a characteristic.
    async fn write_characteristic(
        &self,
        uuid: Uuid,
        data: &[u8],
        with_response: bool,
    ) -> Result<()>;

    /// Subscribe to notifications from a characteristic.
    async fn subscribe(&self, uuid: Uuid) -> Result<()>;
}

/// Production [`RadioLink`] backed by a btleplug peripheral.
pub struct BleLink {
    peripheral: Peripheral,
}

impl BleLink {
    /// Create a link over a discovered peripheral.
    pub fn new(peripheral: Peripheral) -> Self {
        Self { peripheral }
    }

    /// Get the underlying peripheral.
    pub fn peripheral(&self) -> &Peripheral {
        &self.peripheral
    }

    /// Look up a characteristic by UUID among the discovered services.
    fn find_characteristic(&self, uuid: Uuid) -> Result<Characteristic> {
        self.peripheral
            .services()
            .into_iter()
            .flat_map(|service| service.characteristics)
            .find(|characteristic| characteristic.uuid == uuid)
            .ok_or_else(|| Error::CharacteristicNotFound {
                uuid: uuid.to_string(),
            })
    }
}

#[async_trait]
impl RadioLink for BleLink {
    async fn connect(&self) -> Result<()> {
        if self.peripheral.is_connected().await.unwrap_or(false) {
            debug!("Peripheral already connected at BLE level");
        } else {
            self.peripheral.connect().await.map_err(Error::Bluetooth)?;
        }

        self.peripheral
            .discover_services()
            .await
            .map_err(Error::Bluetooth)?;

        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.peripheral
            .disconnect()
            .await
            .map_err(Error::Bluetooth)
    }

    async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>> {
        let characteristic = self.find_characteristic(uuid)?;

        let data = self
            .peripheral
            .read(&characteristic)
            .await
            .map_err(Error::Bluetooth)?;

        trace!("Read {} bytes from characteristic {}", data.len(), uuid);

        Ok(data)
    }

    async fn write_characteristic(
        &self,
        uuid: Uuid,
        data: &[u8],
        with_response: bool,
    ) -> Result<()> {
        let characteristic = self.find_characteristic(uuid)?;

        let write_type = if with_response {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };

        self.peripheral
            .write(&characteristic, data, write_type)
            .await
            .map_err(Error::Bluetooth)?;

        trace!("Wrote {} bytes to characteristic {}", data.len(), uuid);

        Ok(())
    }

    async fn subscribe(&self, uuid: Uuid) -> Result<()> {
        let characteristic = self.find_characteristic(uuid)?;

        self.peripheral
            .subscribe(&characteristic)
            .await
            .map_err(Error::Bluetooth)?;

        debug!("Subscribed to notifications from {}", uuid);

        Ok(())
    }
}
