use tracing::debug;

use crate::endpoint::Endpoint;
use crate::hub_client::{FetchOutcome, HubClient};
use crate::metrics::DerivedMetrics;
use crate::readings::{self, ReadingAccumulator};
use crate::scheduler::PollScheduler;
use crate::sink::{DisplaySink, OutputRecord};
use crate::status_text;

/// Owns the polling pipeline: the resolved endpoint, the authenticated
/// client and the tick counter gating how often a cycle actually runs.
/// One engine per hub, constructed once per process.
pub struct PollEngine {
    endpoint: Endpoint,
    client: HubClient,
    scheduler: PollScheduler,
}

impl PollEngine {
    pub fn new(endpoint: Endpoint, client: HubClient, scheduler: PollScheduler) -> Self {
        Self {
            endpoint,
            client,
            scheduler,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Host heartbeat entry point. Advances the scheduler and, when a cycle
    /// is due, runs it to completion, retries included. Failures skip
    /// publication for this cycle and never propagate: the heartbeat always
    /// keeps ticking.
    pub async fn heartbeat(&mut self, sink: &mut dyn DisplaySink) {
        if self.scheduler.tick() {
            self.run_cycle(sink).await;
        }
    }

    /// One full fetch → parse → derive → publish cycle, unconditionally.
    pub async fn run_cycle(&mut self, sink: &mut dyn DisplaySink) {
        let payload = match self.client.fetch(&mut self.endpoint).await {
            Ok(FetchOutcome::Payload(payload)) => payload,
            Ok(FetchOutcome::Redirected) => {
                debug!("server reassigned the hub, fetching again next cycle");
                return;
            }
            // Already logged at error severity by the client; the sink keeps
            // whatever it last displayed until the next successful cycle.
            Err(_) => return,
        };

        let acc = readings::parse(&payload);
        let records = build_records(&acc);
        sink.publish(&records);
    }
}

/// Builds the fixed set of display records for one successful cycle.
pub fn build_records(acc: &ReadingAccumulator) -> Vec<OutputRecord> {
    let metrics = DerivedMetrics::from_readings(acc);
    vec![
        OutputRecord::rate("Grid Export", metrics.grid_export),
        OutputRecord::rate("Grid Import", metrics.grid_import),
        OutputRecord::rate("Grid Voltage", acc.grid_voltage),
        OutputRecord::rate("PV Generation", acc.generation - acc.generation_positive),
        OutputRecord::rate("Car Charging", acc.diversion),
        OutputRecord::rate("Home Consumption", metrics.home_consumption),
        OutputRecord::rate("PV Self-consumption", metrics.self_consumption),
        OutputRecord::text("Zappi Mode", status_text::mode_text(acc.mode_code)),
        OutputRecord::text("Zappi Status", status_text::status_text(acc.status_code)),
        OutputRecord::text(
            "Charge Status",
            status_text::charge_state_text(&acc.charge_state),
        ),
    ]
}
