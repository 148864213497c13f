//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vellum_core::CHUNK_SIZE;
use vellum_store::MemoryObjectStore;

/// Configuration for a [`SharedClient`](crate::SharedClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// How long `close` waits for in-flight fetches.
    #[serde(with = "millis")]
    pub drain_timeout: Duration,
    /// Decrypted objects kept by the caching storage layer. Zero disables it.
    pub cache_capacity: usize,
    /// Read chunk for object bodies, used by stores built with
    /// [`memory_store`](Self::memory_store).
    pub chunk_size: usize,
}

impl ClientConfig {
    /// An empty in-memory object store reading in `chunk_size` chunks.
    pub fn memory_store(&self) -> MemoryObjectStore {
        MemoryObjectStore::with_chunk_size(self.chunk_size)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            drain_timeout: Duration::from_secs(30),
            cache_capacity: 1024,
            chunk_size: CHUNK_SIZE,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
