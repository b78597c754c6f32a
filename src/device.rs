//! Device struct and methods.
//!
//! Represents a single IDEAL LED hood controller: the current state
//! snapshot, the shared connection, and the command/update operations.

use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::ble::connection::{ConnectionGuard, ConnectionManager, DEFAULT_TIMEOUT};
use crate::ble::link::{BleLink, RadioLink};
use crate::ble::uuids::{CHARACTERISTIC_RX_UUID, DEFAULT_KEYCODE};
use crate::error::{Error, Result};
use crate::protocol::Command;
use crate::state::State;

/// A single IDEAL LED hood controller.
///
/// The state snapshot is updated from two independent sources: the status
/// characteristic (read or notified while connected) and the broadcast
/// advertisement frame (no connection needed). Each update derives a fresh
/// snapshot from the previous one and replaces it atomically; interleaved
/// updates from both sources are last-write-wins.
pub struct Device<L: RadioLink = BleLink> {
    /// BLE identifier (address or platform UUID).
    identifier: String,
    /// Expected keycode prefix on characteristic payloads.
    keycode: [u8; 4],
    /// Published state snapshot.
    state: RwLock<State>,
    /// Connection manager for the shared link.
    connection: ConnectionManager<L>,
    /// Bound on read/write waits.
    operation_timeout: Duration,
}

impl Device<BleLink> {
    /// Create a device over a discovered btleplug peripheral.
    pub fn new(identifier: impl Into<String>, peripheral: btleplug::platform::Peripheral) -> Self {
        Self::with_link(identifier, BleLink::new(peripheral))
    }
}

impl<L: RadioLink> Device<L> {
    /// Create a device over an arbitrary radio link, with the default keycode.
    pub fn with_link(identifier: impl Into<String>, link: L) -> Self {
        Self {
            identifier: identifier.into(),
            keycode: DEFAULT_KEYCODE,
            state: RwLock::new(State::default()),
            connection: ConnectionManager::new(link),
            operation_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the device keycode.
    pub fn with_keycode(mut self, keycode: [u8; 4]) -> Self {
        self.keycode = keycode;
        self
    }

    /// Override the connect/read/write timeout.
    pub fn with_timeout(mut self, operation_timeout: Duration) -> Self {
        self.connection = self.connection.with_connect_timeout(operation_timeout);
        self.operation_timeout = operation_timeout;
        self
    }

    /// Get the BLE identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Get the current state snapshot.
    pub fn state(&self) -> State {
        *self.state.read()
    }

    /// Access the connection manager.
    pub fn connection(&self) -> &ConnectionManager<L> {
        &self.connection
    }

    /// Acquire a reference to the shared connection, opening it on first use.
    ///
    /// Active operations ([`Device::update`], [`Device::send_command`])
    /// require the returned guard; drop or release it when done so the last
    /// holder closes the link.
    pub async fn connect(&self) -> Result<ConnectionGuard<L>> {
        self.connection.acquire().await
    }

    /// Read the status characteristic and update the state snapshot.
    ///
    /// A payload with the wrong keycode is logged and dropped, returning the
    /// unchanged state. Malformed ASCII propagates as
    /// [`Error::DecodeFormat`], transport failures and [`Error::ReadTimeout`]
    /// as themselves.
    pub async fn update(&self, guard: &ConnectionGuard<L>) -> Result<State> {
        let data = match timeout(
            self.operation_timeout,
            guard.link().read_characteristic(CHARACTERISTIC_RX_UUID),
        )
        .await
        {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => {
                debug!("Failed to update: {}", e);
                return Err(e);
            }
            Err(_) => {
                debug!("Timeout on update");
                return Err(Error::ReadTimeout);
            }
        };

        self.apply_characteristic(&data)
    }

    /// Send a command over the shared connection.
    ///
    /// Writes with response; on success the local light state is updated
    /// optimistically for light commands (the device does not echo results
    /// back).
    pub async fn send_command(&self, guard: &ConnectionGuard<L>, command: Command) -> Result<()> {
        debug!("Sending command {}", command);

        match timeout(
            self.operation_timeout,
            guard
                .link()
                .write_characteristic(CHARACTERISTIC_RX_UUID, command.payload(), true),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!("Failed to write: {}", e);
                return Err(e);
            }
            Err(_) => {
                debug!("Timeout on write");
                return Err(Error::WriteTimeout);
            }
        }

        if let Some(light_on) = command.light_state() {
            let mut state = self.state.write();
            *state = state.with_light_on(light_on);
        }

        Ok(())
    }

    /// Subscribe to status notifications on the shared connection.
    ///
    /// Feed delivered payloads to [`Device::handle_characteristic`].
    pub async fn subscribe(&self, guard: &ConnectionGuard<L>) -> Result<()> {
        guard.link().subscribe(CHARACTERISTIC_RX_UUID).await
    }

    /// Ingest a status characteristic payload (read or notification).
    ///
    /// Safe to call at any time; does not require a held connection
    /// reference. Wrong-keycode payloads are logged and dropped.
    pub fn handle_characteristic(&self, data: &[u8]) -> Result<()> {
        self.apply_characteristic(data).map(|_| ())
    }

    /// Ingest a full advertisement frame, announce tag included.
    ///
    /// Foreign frames are silently ignored. Never blocks; safe to call from
    /// scan callbacks at any time, connected or not.
    pub fn handle_advertisement(&self, frame: &[u8], rssi: i16) {
        let prior = *self.state.read();

        match prior.apply_advertisement_update(frame, rssi) {
            Some(new_state) => {
                *self.state.write() = new_state;
                debug!("Advertisement update result: {:?}", new_state);
            }
            None => debug!("Missing announce tag in advertisement frame"),
        }
    }

    /// Ingest a manufacturer data payload as delivered by the platform.
    ///
    /// The first two announce tag bytes are consumed as the manufacturer ID
    /// during broadcast; this recovers the full frame before decoding.
    pub fn handle_manufacturer_data(&self, payload: &[u8], rssi: i16) {
        let frame = crate::ble::advertising::reconstruct_frame(payload);
        self.handle_advertisement(&frame, rssi);
    }

    fn apply_characteristic(&self, data: &[u8]) -> Result<State> {
        let prior = *self.state.read();

        match prior.apply_characteristic_update(data, &self.keycode) {
            Ok(new_state) => {
                *self.state.write() = new_state;
                debug!("Characteristic update result: {:?}", new_state);
                Ok(new_state)
            }
            Err(Error::KeycodeMismatch) => {
                warn!("Wrong keycode in characteristic data, dropping");
                Ok(prior)
            }
            Err(e) => Err(e),
        }
    }
}

impl<L: RadioLink> std::fmt::Debug for Device<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("identifier", &self.identifier)
            .field("state", &self.state())
            .finish()
    }
}
