//! Local random telemetry, for running without a backend.
//!
//! Same shape the backend sends when it has no serial link: string values,
//! coolant with a unit suffix, five frames a second.

use std::sync::mpsc::Sender;
use std::time::Duration;

use cluster_common::EngineEvent;
use rand::Rng;
use serde_json::json;
use tracing::info;

use crate::transport::TelemetryLink;

/// Time between demo frames.
pub const DEMO_PERIOD: Duration = Duration::from_millis(200);

/// One random frame.
pub fn demo_frame<R: Rng>(rng: &mut R) -> String {
    json!({
        "RPM": rng.gen_range(500..=7000_i32).to_string(),
        "SPEED": rng.gen_range(0..=255_i32).to_string(),
        "COOLANT": format!("{}°C", rng.gen_range(18..=90_i32)),
    })
    .to_string()
}

/// Start the demo source on its own thread.
pub fn spawn(events: Sender<EngineEvent>) -> std::io::Result<TelemetryLink> {
    info!(period_ms = DEMO_PERIOD.as_millis() as u64, "demo telemetry enabled");
    TelemetryLink::spawn("demo", move |stop| {
        let mut rng = rand::thread_rng();
        if events.send(EngineEvent::Connected).is_err() {
            return;
        }
        while !stop.sleep(DEMO_PERIOD) {
            if events.send(EngineEvent::Frame(demo_frame(&mut rng))).is_err() {
                return;
            }
        }
    })
}
