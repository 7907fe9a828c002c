// pending.rs - durable record of the applicant whose payment is in progress
//
// The browser leaves the portal for the bKash checkout page and comes
// back on a fresh load, so the applicant has to outlive the process.
// [`FilePendingStore::persist`] returns only after the record is on disk.

use crate::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const RECORD_VERSION: u32 = 1;
const APP_DIR: &str = "recruitment-portal";
const FILE_NAME: &str = "pending.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Approved,
    #[default]
    #[serde(rename = "Not Approved", alias = "Pending")]
    NotApproved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApplicant {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub apply_for: String,
    pub selected_subject: Option<String>,
    pub payment_status: PaymentStatus,
    pub photo_url: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PendingRecord {
    version: u32,
    applicant: PendingApplicant,
}

pub trait PendingStore {
    fn persist(&self, applicant: &PendingApplicant) -> Result<()>;
    fn load(&self) -> Result<Option<PendingApplicant>>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FilePendingStore {
    path: PathBuf,
}

impl FilePendingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePendingStore { path: path.into() }
    }

    /// `<data dir>/recruitment-portal/pending.json`
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_local_dir().ok_or(PortalError::NoDataDir)?;
        Ok(Self::new(base.join(APP_DIR).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl PendingStore for FilePendingStore {
    fn persist(&self, applicant: &PendingApplicant) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let record = PendingRecord {
            version: RECORD_VERSION,
            applicant: applicant.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&record)?;

        // Write then rename so a crash never leaves a half-written record
        let temp = self.temp_path();
        let mut file = File::create(&temp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temp, &self.path)?;

        debug!("Persisted pending applicant {} to {}", applicant.id, self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<PendingApplicant>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: PendingRecord = serde_json::from_slice(&bytes)?;
        if record.version != RECORD_VERSION {
            warn!(
                "Ignoring pending applicant record with version {} (expected {})",
                record.version, RECORD_VERSION
            );
            return Ok(None);
        }
        Ok(Some(record.applicant))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleared pending applicant at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryPendingStore {
    slot: Arc<Mutex<Option<PendingApplicant>>>,
}

impl MemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PendingStore for MemoryPendingStore {
    fn persist(&self, applicant: &PendingApplicant) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(applicant.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<PendingApplicant>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
