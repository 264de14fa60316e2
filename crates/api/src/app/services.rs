use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use stockhold_core::{DomainError, DomainResult, IdGenerator, SystemClock, UuidV7Generator};
use stockhold_infra::ExpirySweeperHandle;
use stockhold_inventory::{InventoryService, Seed};

/// Timestamp of the demo provisioning events.
pub const DEMO_SEED_AT: &str = "2023-10-01T15:09:59Z";

/// Demo inventory: ABC123@WH1 = 100 and DEF456@WH2 = 200.
pub fn demo_seed(ids: &dyn IdGenerator, at: DateTime<Utc>) -> DomainResult<Seed> {
    Seed::new()
        .with_provisioned(ids.event_id(), "ABC123", "WH1", 100, at)?
        .with_provisioned(ids.event_id(), "DEF456", "WH2", 200, at)
}

/// Build the process-wide inventory service on the system clock, seeded
/// with the demo inventory.
pub fn build_services() -> DomainResult<Arc<InventoryService>> {
    let ids = Arc::new(UuidV7Generator);
    let at = DateTime::parse_from_rfc3339(DEMO_SEED_AT)
        .map_err(|e| DomainError::validation(format!("demo seed timestamp: {e}")))?
        .with_timezone(&Utc);
    let seed = demo_seed(ids.as_ref(), at)?;
    let service = InventoryService::from_seed(seed, Arc::new(SystemClock), ids)?;
    Ok(Arc::new(service))
}

/// Stop the expiry sweeper and wait for its thread.
///
/// The join blocks, so it runs on the blocking pool rather than an async worker.
pub async fn stop_sweeper(sweeper: ExpirySweeperHandle) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || sweeper.shutdown())
        .await
        .context("expiry sweeper did not shut down cleanly")
}
