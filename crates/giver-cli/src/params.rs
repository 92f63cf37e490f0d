//! Chain-parameter input: the six `get_mining_data` values.
//!
//! The values arrive pre-fetched, either as individual hex flags or as a
//! JSON file holding the hex strings the RPC tooling prints.

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use giver_core::{biguint_from_hex, u64_from_hex, MiningData};

/// On-disk form of a `get_mining_data` response, all fields hex.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MiningDataFile {
    pub complexity: String,
    pub last_success: String,
    pub seed: String,
    pub target_delta: String,
    pub min_cpl: String,
    pub max_cpl: String,
}

pub fn load_params_file<P>(path: P) -> Result<MiningDataFile>
where
    P: AsRef<Path>,
{
    let file = File::open(&path)
        .with_context(|| format!("cannot open mining data file {:?}", path.as_ref()))?;
    let params = serde_json::from_reader(file)
        .with_context(|| format!("malformed mining data file {:?}", path.as_ref()))?;
    Ok(params)
}

impl MiningDataFile {
    pub fn to_mining_data(&self) -> Result<MiningData> {
        Ok(MiningData {
            complexity: biguint_from_hex(&self.complexity).context("complexity")?,
            last_success: u64_from_hex(&self.last_success).context("last_success")?,
            seed: biguint_from_hex(&self.seed).context("seed")?,
            target_delta: u64_from_hex(&self.target_delta).context("target_delta")?,
            min_cpl: u64_from_hex(&self.min_cpl).context("min_cpl")?,
            max_cpl: u64_from_hex(&self.max_cpl).context("max_cpl")?,
        })
    }
}

/// Combine a parameter file (if given) with inline flag overrides.
pub fn resolve_mining_data(
    file: Option<MiningDataFile>,
    complexity: Option<&str>,
    seed: Option<&str>,
    last_success: Option<&str>,
    target_delta: Option<&str>,
    min_cpl: Option<&str>,
    max_cpl: Option<&str>,
) -> Result<MiningData> {
    let mut data = match file {
        Some(file) => file.to_mining_data()?,
        None => {
            let (Some(complexity), Some(seed)) = (complexity, seed) else {
                bail!("either --mining-data or both --complexity and --seed are required");
            };
            MiningData {
                complexity: biguint_from_hex(complexity).context("complexity")?,
                last_success: 0,
                seed: biguint_from_hex(seed).context("seed")?,
                target_delta: 0,
                min_cpl: 0,
                max_cpl: 0,
            }
        }
    };

    if let Some(complexity) = complexity {
        data.complexity = biguint_from_hex(complexity).context("complexity")?;
    }
    if let Some(seed) = seed {
        data.seed = biguint_from_hex(seed).context("seed")?;
    }
    if let Some(last_success) = last_success {
        data.last_success = u64_from_hex(last_success).context("last_success")?;
    }
    if let Some(target_delta) = target_delta {
        data.target_delta = u64_from_hex(target_delta).context("target_delta")?;
    }
    if let Some(min_cpl) = min_cpl {
        data.min_cpl = u64_from_hex(min_cpl).context("min_cpl")?;
    }
    if let Some(max_cpl) = max_cpl {
        data.max_cpl = u64_from_hex(max_cpl).context("max_cpl")?;
    }

    Ok(data)
}
