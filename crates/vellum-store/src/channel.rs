//! Storage channel lifecycle: open, scoped use, graceful close.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use vellum_core::ContentDigest;
use vellum_crypto::Affiliate;

use crate::error::{Result, StoreError};
use crate::traits::StorageClient;

struct ChannelState {
    open: bool,
    in_flight: usize,
}

/// Owns a storage client and tracks fetches in flight through it.
///
/// Once [`close`](Self::close) is called no new fetch is admitted; close then
/// waits, up to its timeout, for admitted fetches to finish.
pub struct StorageChannel {
    client: Box<dyn StorageClient>,
    state: Mutex<ChannelState>,
    drained: Condvar,
}

/// Admission ticket for one fetch. Dropping it releases the slot.
struct InFlight<'a> {
    channel: &'a StorageChannel,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.channel.lock();
        state.in_flight -= 1;
        if state.in_flight == 0 {
            self.channel.drained.notify_all();
        }
    }
}

impl StorageChannel {
    /// Open a channel over `client`.
    pub fn open(client: impl StorageClient + 'static) -> Self {
        Self {
            client: Box::new(client),
            state: Mutex::new(ChannelState {
                open: true,
                in_flight: 0,
            }),
            drained: Condvar::new(),
        }
    }

    /// False once the channel has been closed.
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Fetches currently running.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Stop admitting fetches and wait up to `timeout` for in-flight ones.
    ///
    /// Idempotent. On timeout the channel stays closed and the stragglers
    /// are left to finish on their own.
    pub fn close(&self, timeout: Duration) -> Result<()> {
        let mut state = self.lock();
        state.open = false;

        let (state, wait) = self
            .drained
            .wait_timeout_while(state, timeout, |s| s.in_flight > 0)
            .unwrap_or_else(PoisonError::into_inner);

        if wait.timed_out() {
            warn!(in_flight = state.in_flight, ?timeout, "storage channel close timed out");
            return Err(StoreError::DrainTimeout {
                timeout,
                in_flight: state.in_flight,
            });
        }
        info!("storage channel closed");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self) -> Result<InFlight<'_>> {
        let mut state = self.lock();
        if !state.open {
            return Err(StoreError::Closed);
        }
        state.in_flight += 1;
        Ok(InFlight { channel: self })
    }
}

impl StorageClient for StorageChannel {
    fn fetch(&self, type_name: &str, hash: &ContentDigest, affiliate: &Affiliate) -> Result<Bytes> {
        let _ticket = self.admit()?;
        self.client.fetch(type_name, hash, affiliate)
    }
}
