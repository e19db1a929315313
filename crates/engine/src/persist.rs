//! Stored form of the history: a versioned, checksummed msgpack envelope
//! around `{ state, history, currentIndex }`. Derived fields are stripped
//! on the way out and recomputed on the way in.

use serde::{Deserialize, Serialize};
use shiftplan_core::StoredConfig;

use crate::error::EngineError;
use crate::history::HistoryManager;

pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedHistory {
    pub state: StoredConfig,
    pub history: Vec<StoredConfig>,
    pub current_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEnvelope {
    pub version: u32,
    /// Hex blake3 digest of `payload`.
    pub checksum: String,
    pub payload: Vec<u8>,
}

impl PersistedHistory {
    pub fn from_history(history: &HistoryManager) -> Self {
        Self {
            state: history.current().to_stored(),
            history: history.entries().iter().map(|s| s.to_stored()).collect(),
            current_index: history.current_index(),
        }
    }

    pub fn into_history(self, limit: usize) -> HistoryManager {
        let current = self.state.into_state();
        let entries = self
            .history
            .into_iter()
            .map(StoredConfig::into_state)
            .collect();
        HistoryManager::from_parts(current, entries, self.current_index, limit)
    }
}

pub fn encode(history: &HistoryManager) -> Result<Vec<u8>, EngineError> {
    let payload = rmp_serde::to_vec_named(&PersistedHistory::from_history(history))
        .map_err(|e| EngineError::Codec(e.to_string()))?;
    let envelope = PersistedEnvelope {
        version: ENVELOPE_VERSION,
        checksum: blake3::hash(&payload).to_hex().to_string(),
        payload,
    };
    rmp_serde::to_vec_named(&envelope).map_err(|e| EngineError::Codec(e.to_string()))
}

pub fn decode(bytes: &[u8], limit: usize) -> Result<HistoryManager, EngineError> {
    let envelope: PersistedEnvelope =
        rmp_serde::from_slice(bytes).map_err(|e| EngineError::Codec(e.to_string()))?;
    if envelope.version != ENVELOPE_VERSION {
        return Err(EngineError::UnsupportedVersion(envelope.version));
    }
    if blake3::hash(&envelope.payload).to_hex().as_str() != envelope.checksum {
        return Err(EngineError::ChecksumMismatch);
    }
    let persisted: PersistedHistory = rmp_serde::from_slice(&envelope.payload)
        .map_err(|e| EngineError::Codec(e.to_string()))?;
    if persisted.history.is_empty() {
        return Err(EngineError::EmptyHistory);
    }
    Ok(persisted.into_history(limit))
}
