use formats::{SiteCollection, StatNameLookup, StatsPayload};
use tracing::info;

use crate::error::BridgeError;
use crate::ports::{AppPorts, OutboundMessage};

/// Page element the statistics application is embedded into.
pub trait AppHost {
    type Ports: AppPorts;

    /// Removes every child of the host element; returns how many were removed.
    fn clear_host(&mut self) -> Result<usize, BridgeError>;

    /// Embeds the application with its initial datasets.
    fn embed(&mut self) -> Result<Self::Ports, BridgeError>;
}

/// Clears the host, embeds the application, and sends the per-site
/// statistics once.
pub fn bootstrap<H: AppHost>(
    host: &mut H,
    observed: &SiteCollection,
    names: &StatNameLookup,
) -> Result<H::Ports, BridgeError> {
    let removed = host.clear_host()?;
    if removed > 0 {
        info!("cleared {removed} stale nodes from application host");
    }
    let ports = host.embed()?;

    let payload = StatsPayload::from_sources(observed, names);
    info!(
        "sending statistics for {} observed sites",
        payload.sites_observed.len()
    );
    ports.send(OutboundMessage::StatsForSites(payload))?;
    Ok(ports)
}
