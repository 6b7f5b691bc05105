//! Connection lifecycle for a key-custody network.
//!
//! A [`NetworkHandle`] owns one network client and connects to it at most
//! once. The connect slot is guarded by an async mutex held across the
//! dial, so concurrent callers coalesce onto a single attempt instead of
//! racing.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::network::{KeyNetwork, NetworkConfig, NetworkInfo};

/// Owns a network client and its at-most-one connection.
///
/// There is no ambient global: anything that needs the network takes a
/// reference to the handle.
pub struct NetworkHandle<N: KeyNetwork> {
    network: N,
    config: NetworkConfig,
    connection: Mutex<Option<Arc<NetworkInfo>>>,
}

impl<N: KeyNetwork> NetworkHandle<N> {
    pub fn new(network: N, config: NetworkConfig) -> Self {
        Self {
            network,
            config,
            connection: Mutex::new(None),
        }
    }

    /// Connect if not yet connected, returning the connection info.
    ///
    /// The lock is held across the dial: whichever caller arrives first
    /// performs it, everyone else waits and receives the same
    /// [`NetworkInfo`]. A failed dial leaves the slot empty so a later
    /// call can retry.
    pub async fn connect(&self) -> Result<Arc<NetworkInfo>> {
        let mut slot = self.connection.lock().await;
        if let Some(info) = slot.as_ref() {
            return Ok(Arc::clone(info));
        }
        let info = Arc::new(self.network.fetch_network_info().await?);
        tracing::debug!("Connected to key network on chain {}", info.chain);
        *slot = Some(Arc::clone(&info));
        Ok(info)
    }

    /// Whether a connection is currently established.
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Drop the connection and let the network tear down its side.
    ///
    /// Idempotent: only an established connection triggers a disconnect
    /// call. A later [`connect`](Self::connect) dials again.
    pub async fn shutdown(&self) -> Result<()> {
        let had_connection = self.connection.lock().await.take().is_some();
        if had_connection {
            self.network.disconnect().await?;
        }
        Ok(())
    }

    /// Chain this handle's conditions are written and evaluated against.
    pub fn chain(&self) -> &str {
        &self.config.chain
    }

    /// The underlying network client.
    pub fn network(&self) -> &N {
        &self.network
    }
}
