//! Serializable peripheral state.
//!
//! Each model converts itself to and from a plain snapshot struct; a
//! [`SnapshotFile`] bundles several of them into one bincode file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PeripheralError, PeripheralResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSnapshot {
    pub address: u8,
    pub read: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SensorSnapshot {
    pub registers: Vec<(u64, u32)>,
    pub acceleration: [f64; 3],
    pub chip_selected: bool,
    pub transaction: Option<TransactionSnapshot>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlashSnapshot {
    pub registers: Vec<(u64, u32)>,
    pub status: u8,
    pub last_command: u32,
    pub chip_selected: bool,
    /// Response byte cursor of an open serial transaction.
    pub response_cursor: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PeripheralSnapshot {
    Sensor(SensorSnapshot),
    Flash(FlashSnapshot),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotFile {
    pub version: u32,
    pub timestamp: u64,
    pub peripherals: Vec<(String, PeripheralSnapshot)>,
}

impl Default for SnapshotFile {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFile {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            peripherals: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, snapshot: PeripheralSnapshot) {
        self.peripherals.push((name.into(), snapshot));
    }

    pub fn get(&self, name: &str) -> Option<&PeripheralSnapshot> {
        self.peripherals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn to_bytes(&self) -> PeripheralResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| PeripheralError::snapshot("Failed to serialize snapshot", e))
    }

    pub fn from_bytes(data: &[u8]) -> PeripheralResult<Self> {
        let snapshot: SnapshotFile = bincode::deserialize(data)
            .map_err(|e| PeripheralError::snapshot("Failed to deserialize snapshot", e))?;
        if snapshot.version > Self::CURRENT_VERSION {
            return Err(PeripheralError::SnapshotVersion {
                found: snapshot.version,
                supported: Self::CURRENT_VERSION,
            });
        }
        Ok(snapshot)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PeripheralResult<()> {
        let data = self.to_bytes()?;
        fs::write(path.as_ref(), data).map_err(|e| {
            PeripheralError::snapshot(
                format!("Failed to write snapshot {}", path.as_ref().display()),
                e,
            )
        })?;
        log::debug!("Snapshot written to: {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PeripheralResult<Self> {
        let data = fs::read(path.as_ref()).map_err(|e| {
            PeripheralError::snapshot(
                format!("Failed to read snapshot {}", path.as_ref().display()),
                e,
            )
        })?;
        let snapshot = Self::from_bytes(&data)?;
        log::debug!("Snapshot loaded from: {}", path.as_ref().display());
        Ok(snapshot)
    }
}
