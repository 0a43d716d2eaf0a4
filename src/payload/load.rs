use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

use super::campaigns::CampaignCatalog;
use super::network::NetworkPayload;

/// Where each payload comes from. A missing path means the payload is absent.
#[derive(Clone, Debug, Default)]
pub struct PayloadPaths {
    pub network_graph: Option<PathBuf>,
    pub campaigns: Option<PathBuf>,
}

/// Both payloads as handed to the views. `None` renders as an empty state.
#[derive(Clone, Debug, Default)]
pub struct PayloadSet {
    pub network: Option<NetworkPayload>,
    pub campaigns: Option<CampaignCatalog>,
}

pub fn load_payloads(paths: &PayloadPaths) -> Result<PayloadSet> {
    let network = match &paths.network_graph {
        Some(path) => read_json(path)
            .with_context(|| format!("failed to load network graph from {}", path.display()))?
            .map(|value| NetworkPayload::from_value(&value)),
        None => None,
    };

    let campaigns = match &paths.campaigns {
        Some(path) => read_json(path)
            .with_context(|| format!("failed to load campaigns from {}", path.display()))?
            .map(|value| CampaignCatalog::from_value(&value)),
        None => None,
    };

    if let Some(network) = &network {
        info!(
            "loaded network payload: {} campaigns, {} hate words",
            network.campaigns.len(),
            network.hate_words.len()
        );
    }
    if let Some(campaigns) = &campaigns {
        info!("loaded campaign payload: {} global campaigns", campaigns.globals.len());
    }

    Ok(PayloadSet { network, campaigns })
}

fn read_json(path: &Path) -> Result<Option<Value>> {
    let raw = fs::read_to_string(path).context("could not read payload file")?;
    parse_json(&raw)
}

/// Parses a payload document; a literal `null` counts as an absent payload.
pub(super) fn parse_json(raw: &str) -> Result<Option<Value>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON payload")?;
    if parsed.is_null() {
        Ok(None)
    } else {
        Ok(Some(parsed))
    }
}
