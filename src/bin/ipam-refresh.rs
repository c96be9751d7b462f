// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPAM Refresh
//!
//! Refreshes persisted resource state files against a WAPI grid master.
//!
//! Each state file holds one serialized `ResourceState`. Objects that still
//! exist (possibly under a new reference) are written back; objects that are
//! gone have their state file removed.
//!
//! Run with: cargo run --bin ipam-refresh --features wapi -- network state/*.json
//!
//! Prerequisites:
//! 1. INFOBLOX_SERVER, INFOBLOX_USERNAME and INFOBLOX_PASSWORD set
//! 2. Optional: INFOBLOX_PORT, WAPI_VERSION, INFOBLOX_SSL_VERIFY,
//!    INFOBLOX_TIMEOUT, INFOBLOX_PROXY_SEARCH

use anyhow::{bail, Context, Result};
use cim_ipam::{
    config::WapiConfig,
    logging::init_logging,
    reconciler::{ReadOutcome, ResourceAdapter, ResourceReconciler, ResourceState},
    resources::{
        NetworkAdapter, NetworkTemplateAdapter, NetworkViewAdapter, SuperHostAdapter,
        VlanAdapter,
    },
    store::WapiObjectStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

const USAGE: &str = "usage: ipam-refresh <networkview|network|ipv6network|vlan|superhost|networktemplate> <state.json>...";

/// What happened to one state file
#[derive(Debug)]
enum FileOutcome {
    Refreshed { moved: bool },
    Removed,
}

#[derive(Debug, Default)]
struct Summary {
    refreshed: usize,
    moved: usize,
    removed: usize,
    failed: usize,
}

async fn refresh_file<A>(
    reconciler: &ResourceReconciler<WapiObjectStore, A>,
    path: &Path,
) -> Result<FileOutcome>
where
    A: ResourceAdapter,
{
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let state: ResourceState<A::Spec> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    match reconciler.read(&state).await? {
        ReadOutcome::Present(refreshed) => {
            let moved = refreshed.reference != state.reference;
            if moved {
                warn!(
                    "{}: {} recovered as {}",
                    path.display(),
                    state.reference,
                    refreshed.reference
                );
            }
            let text = serde_json::to_string_pretty(&refreshed)?;
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(FileOutcome::Refreshed { moved })
        }
        ReadOutcome::Removed => {
            info!("{}: {} no longer exists", path.display(), state.reference);
            tokio::fs::remove_file(path)
                .await
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            Ok(FileOutcome::Removed)
        }
    }
}

async fn refresh_all<A>(
    store: Arc<WapiObjectStore>,
    config: &WapiConfig,
    adapter: A,
    paths: &[PathBuf],
) -> Summary
where
    A: ResourceAdapter,
{
    let reconciler = ResourceReconciler::new(store, adapter).with_options(config.search_options());

    let results = futures::future::join_all(
        paths.iter().map(|path| refresh_file(&reconciler, path)),
    )
    .await;

    let mut summary = Summary::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(FileOutcome::Refreshed { moved }) => {
                summary.refreshed += 1;
                if moved {
                    summary.moved += 1;
                }
            }
            Ok(FileOutcome::Removed) => summary.removed += 1,
            Err(e) => {
                error!("{}: {:#}", path.display(), e);
                summary.failed += 1;
            }
        }
    }
    summary
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(tracing::Level::INFO);

    let mut args = std::env::args().skip(1);
    let resource_type = args.next().context(USAGE)?;
    let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!(USAGE);
    }

    let config = WapiConfig::from_env().context("Failed to load WAPI configuration")?;
    info!("Refreshing {} {} state file(s) against {}", paths.len(), resource_type, config.server);

    let store = Arc::new(WapiObjectStore::new(config.clone())?);

    let summary = match resource_type.as_str() {
        "networkview" => refresh_all(store, &config, NetworkViewAdapter, &paths).await,
        "network" => refresh_all(store, &config, NetworkAdapter::ipv4(), &paths).await,
        "ipv6network" => refresh_all(store, &config, NetworkAdapter::ipv6(), &paths).await,
        "vlan" => refresh_all(store, &config, VlanAdapter, &paths).await,
        "superhost" => refresh_all(store, &config, SuperHostAdapter, &paths).await,
        "networktemplate" => refresh_all(store, &config, NetworkTemplateAdapter, &paths).await,
        other => bail!("unknown resource type '{}'\n{}", other, USAGE),
    };

    info!(
        "Done: {} refreshed ({} recovered under a new reference), {} removed, {} failed",
        summary.refreshed, summary.moved, summary.removed, summary.failed
    );

    if summary.failed > 0 {
        bail!("{} state file(s) failed to refresh", summary.failed);
    }
    Ok(())
}
