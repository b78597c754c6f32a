//! Reference-counted connection management.
//!
//! Several logical operations may need the physical link at the same time:
//! the link is opened when the first holder acquires it and closed when the
//! last holder releases it. All transitions of the (link, holder count) pair
//! are serialized by one async gate per device, so concurrent acquires
//! coalesce into a single physical connect and only the final release
//! triggers the physical disconnect.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::ble::link::RadioLink;
use crate::error::{Error, Result};

/// Default bound on connect/read/write waits.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the lifecycle of one shared physical link.
///
/// Invariant: the link is open iff the holder count is greater than zero.
pub struct ConnectionManager<L: RadioLink> {
    link: Arc<L>,
    holders: Arc<Mutex<usize>>,
    connect_timeout: Duration,
}

impl<L: RadioLink> ConnectionManager<L> {
    /// Create a manager for a link.
    pub fn new(link: L) -> Self {
        Self {
            link: Arc::new(link),
            holders: Arc::new(Mutex::new(0)),
            connect_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the connect timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Access the underlying link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Number of active holders.
    pub async fn holders(&self) -> usize {
        *self.holders.lock().await
    }

    /// Acquire a reference to the shared link.
    ///
    /// Opens the physical link when no holder exists yet, otherwise reuses
    /// it. The open is bounded by the connect timeout; on
    /// [`Error::ConnectTimeout`] or a transport failure the count stays at
    /// zero and no link is retained.
    ///
    /// Call [`ConnectionGuard::release`] when done: it decrements the count
    /// and disconnects inline when this was the last holder. Merely dropping
    /// the guard spawns that bookkeeping onto the current runtime instead;
    /// outside a runtime the drop can only warn, and the holder count (and
    /// link) leaks. `release().await` is the guaranteed path.
    pub async fn acquire(&self) -> Result<ConnectionGuard<L>> {
        let mut holders = self.holders.lock().await;

        if *holders == 0 {
            debug!("Connecting");
            match timeout(self.connect_timeout, self.link.connect()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!("Error on connect: {}", e);
                    return Err(e);
                }
                Err(_) => {
                    debug!("Timeout on connect");
                    return Err(Error::ConnectTimeout);
                }
            }
        } else {
            debug!("Connection reused");
        }

        *holders += 1;

        Ok(ConnectionGuard {
            link: self.link.clone(),
            holders: self.holders.clone(),
            released: false,
        })
    }
}

/// A held reference to the shared link.
///
/// Prefer [`ConnectionGuard::release`], which disconnects inline when this
/// is the last holder. Dropping the guard releases too, but has to spawn the
/// bookkeeping onto the runtime, so the disconnect completes asynchronously.
pub struct ConnectionGuard<L: RadioLink> {
    link: Arc<L>,
    holders: Arc<Mutex<usize>>,
    released: bool,
}

impl<L: RadioLink> ConnectionGuard<L> {
    /// Access the link. Valid for the lifetime of this guard.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Release this reference, disconnecting if it is the last one.
    pub async fn release(mut self) {
        self.released = true;
        Self::release_inner(&self.link, &self.holders).await;
    }

    async fn release_inner(link: &Arc<L>, holders: &Arc<Mutex<usize>>) {
        let mut holders = holders.lock().await;
        *holders = holders.saturating_sub(1);

        if *holders == 0 {
            if let Err(e) = link.disconnect().await {
                warn!("Error on disconnect: {}", e);
            }
            debug!("Disconnected");
        }
    }
}

impl<L: RadioLink> Drop for ConnectionGuard<L> {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let link = self.link.clone();
        let holders = self.holders.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    Self::release_inner(&link, &holders).await;
                });
            }
            Err(_) => warn!("Connection guard dropped outside a runtime; link leaked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::link::MockRadioLink;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_concurrent_acquires_share_one_connect() {
        let mut link = MockRadioLink::new();
        link.expect_connect().times(1).returning(|| Ok(()));
        link.expect_disconnect().times(1).returning(|| Ok(()));

        let manager = ConnectionManager::new(link);

        let (first, second) = tokio::join!(manager.acquire(), manager.acquire());
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(manager.holders().await, 2);

        first.release().await;
        assert_eq!(manager.holders().await, 1);

        second.release().await;
        assert_eq!(manager.holders().await, 0);
    }

    #[tokio::test]
    async fn test_release_order_does_not_matter() {
        let mut link = MockRadioLink::new();
        link.expect_connect().times(1).returning(|| Ok(()));
        link.expect_disconnect().times(1).returning(|| Ok(()));

        let manager = ConnectionManager::new(link);

        let first = manager.acquire().await.unwrap();
        let second = manager.acquire().await.unwrap();

        // Release in acquisition order this time.
        second.release().await;
        first.release().await;

        assert_eq!(manager.holders().await, 0);
    }

    #[tokio::test]
    async fn test_reconnects_after_full_release() {
        let mut link = MockRadioLink::new();
        link.expect_connect().times(2).returning(|| Ok(()));
        link.expect_disconnect().times(2).returning(|| Ok(()));

        let manager = ConnectionManager::new(link);

        manager.acquire().await.unwrap().release().await;
        manager.acquire().await.unwrap().release().await;
    }

    #[tokio::test]
    async fn test_connect_failure_keeps_count_zero() {
        let mut link = MockRadioLink::new();
        link.expect_connect()
            .times(1)
            .returning(|| Err(Error::BluetoothUnavailable));
        link.expect_disconnect().times(0);

        let manager = ConnectionManager::new(link);

        let result = manager.acquire().await;
        assert!(matches!(result, Err(Error::BluetoothUnavailable)));
        assert_eq!(manager.holders().await, 0);
    }

    /// Link whose connect never completes, for exercising the timeout bound.
    struct StalledLink {
        disconnects: AtomicUsize,
    }

    #[async_trait]
    impl RadioLink for StalledLink {
        async fn connect(&self) -> Result<()> {
            std::future::pending().await
        }

        async fn disconnect(&self) -> Result<()> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn read_characteristic(&self, _uuid: Uuid) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        async fn write_characteristic(
            &self,
            _uuid: Uuid,
            _data: &[u8],
            _with_response: bool,
        ) -> Result<()> {
            Ok(())
        }

        async fn subscribe(&self, _uuid: Uuid) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_connect_timeout_leaves_disconnected() {
        let manager = ConnectionManager::new(StalledLink {
            disconnects: AtomicUsize::new(0),
        })
        .with_connect_timeout(Duration::from_millis(10));

        let result = manager.acquire().await;
        assert!(matches!(result, Err(Error::ConnectTimeout)));
        assert_eq!(manager.holders().await, 0);
        assert_eq!(manager.link().disconnects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_in_background() {
        let mut link = MockRadioLink::new();
        link.expect_connect().times(1).returning(|| Ok(()));
        link.expect_disconnect().times(1).returning(|| Ok(()));

        let manager = ConnectionManager::new(link);

        let guard = manager.acquire().await.unwrap();
        drop(guard);

        // Drop spawns the release; give it a chance to run.
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(manager.holders().await, 0);
    }
}
