//! Demo: run a simulated bridge device end to end.
//!
//! Wires the mock SDK, the command facade, and the event dispatcher
//! together, streams a few hundred milliseconds of samples, injects a
//! fault, and tears everything down in the safe order (SDK first, then
//! the dispatcher drains and exits).
//!
//! ```sh
//! RUST_LOG=debug cargo run -p loadbridge-cli
//! ```

use anyhow::Result;
use loadbridge_core::BridgeGain;
use loadbridge_events::event_channel;
use loadbridge_hardware::mock::MockSdk;
use loadbridge_hardware::{Bridge, library_version};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (sdk, sim) = MockSdk::new();
    let version = library_version(sdk.as_ref())?;
    info!(%version, "SDK initialized");

    let (sink, mut dispatcher) = event_channel();
    dispatcher.on_attach(|device| info!(%device, "device attached"));
    dispatcher.on_detach(|device| info!(%device, "device detached"));
    dispatcher.on_error(|device, message| warn!(%device, message, "device fault"));
    dispatcher.on_data(|device, channel, value| {
        info!(%device, channel, value, "sample");
    });

    let bridge = Bridge::create(sdk, &sink)?;
    // The SDK callbacks own their sink clones now; release ours so the
    // dispatcher can exit once the SDK shuts down.
    drop(sink);

    bridge.open_any()?;
    let handle = bridge.handle();

    // Run dispatch on its own task: that task is the consumer context,
    // and every handler above runs there.
    let consumer = tokio::spawn(async move {
        dispatcher.run().await;
    });

    sim.attach(45071).expect("open instance should match any serial");
    bridge.wait_for_attachment(Duration::from_secs(1))?;
    let info = bridge.info()?;
    info!(?info, "attached");

    bridge.set_data_rate(50)?;
    bridge.set_gain(0, BridgeGain::G8)?;
    bridge.set_enabled(0, true)?;
    sim.set_channel_value(handle, 0, 0.618);

    sim.start_sampling(handle);
    tokio::time::sleep(Duration::from_millis(300)).await;

    sim.raise_error(handle, 3, "input saturated");
    sim.stop_sampling(handle);
    sim.detach(handle);

    bridge.close()?;
    bridge.remove()?;

    // SDK down first; the dispatcher then drains the residue and exits.
    sim.shutdown();
    consumer.await?;

    info!("done");
    Ok(())
}
