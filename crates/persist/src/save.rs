use crate::store::{StoreError, sha256_hex};
use focustown_kernel::TownState;
use focustown_pomodoro::FocusStats;
use focustown_progression::{ProgressionSnapshot, Wallet};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Schema version written into every save.
pub const SAVE_SCHEMA_VERSION: u32 = 2;

/// Everything needed to resume a session, plus a checksum over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    pub schema_version: u32,
    /// Seconds since the Unix epoch.
    pub saved_at: u64,
    /// SHA-256 hex of the canonical JSON of `{town, progression, wallet, focus}`.
    pub checksum: String,
    pub town: TownState,
    pub progression: ProgressionSnapshot,
    pub wallet: Wallet,
    #[serde(default)]
    pub focus: FocusStats,
}

#[derive(Serialize)]
struct Payload<'a> {
    town: &'a TownState,
    progression: &'a ProgressionSnapshot,
    wallet: &'a Wallet,
    focus: &'a FocusStats,
}

impl SaveGame {
    pub fn new(
        town: TownState,
        progression: ProgressionSnapshot,
        wallet: Wallet,
        focus: FocusStats,
    ) -> Result<Self, StoreError> {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut save = Self {
            schema_version: SAVE_SCHEMA_VERSION,
            saved_at,
            checksum: String::new(),
            town,
            progression,
            wallet,
            focus,
        };
        save.checksum = save.compute_checksum()?;
        Ok(save)
    }

    /// Hash of the payload as it would be written now.
    pub fn compute_checksum(&self) -> Result<String, StoreError> {
        let payload = Payload {
            town: &self.town,
            progression: &self.progression,
            wallet: &self.wallet,
            focus: &self.focus,
        };
        Ok(sha256_hex(&serde_json::to_vec(&payload)?))
    }

    /// Check schema version first, then the checksum.
    pub fn verify(&self) -> Result<(), StoreError> {
        if self.schema_version != SAVE_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: self.schema_version,
                expected_version: SAVE_SCHEMA_VERSION,
            });
        }
        let actual = self.compute_checksum()?;
        if actual != self.checksum {
            return Err(StoreError::IntegrityMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        Ok(())
    }
}
