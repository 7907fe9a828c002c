// fees.rs - application fee per position

use crate::error::ApiError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, error};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FeeTable {
    fees: HashMap<String, u32>,
}

impl Default for FeeTable {
    fn default() -> Self {
        FeeTable {
            fees: HashMap::from([
                ("Assistant Teacher".to_string(), 300),
                ("Teacher Assistant".to_string(), 200),
            ]),
        }
    }
}

impl FeeTable {
    /// Reads a table of the form `[fees]` / `"Assistant Teacher" = 300`.
    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        debug!("Loading fee table from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| {
            error!("Error reading fee table {}: {}", path.display(), e);
            ApiError::Configuration(format!("Failed to read {}", path.display()))
        })?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ApiError> {
        let table: FeeTable = toml::from_str(contents)
            .map_err(|e| ApiError::Configuration(format!("Invalid fee table: {}", e)))?;

        if let Some((position, _)) = table.fees.iter().find(|(_, fee)| **fee == 0) {
            return Err(ApiError::Configuration(format!(
                "Fee for {} must be positive",
                position
            )));
        }

        Ok(table)
    }

    // Never falls back to zero: an unknown position aborts the payment
    pub fn resolve(&self, position: &str) -> Result<u32, ApiError> {
        match self.fees.get(position) {
            Some(fee) if *fee > 0 => Ok(*fee),
            _ => Err(ApiError::Configuration(format!(
                "No fee configured for position {:?}",
                position
            ))),
        }
    }
}
