//! End-to-end plumbing over the static channels: broker topic -> relay ->
//! command channel, and uplink client -> hub task -> response.
//!
//! Everything here shares process-wide statics, so it is written as one
//! sequential scenario rather than parallel test functions.

use edge_executor::LocalExecutor;
use embassy_futures::join::join;
use embassy_time::{with_timeout, Duration, Timer};
use futures_lite::future::block_on;

use agrinode::adapters::uplink::{HubChannelClient, HubQueryClient};
use agrinode::broker::{command_relay_task, publish_raw};
use agrinode::channels::COMMAND_CHANNEL;
use agrinode::config::NodeConfig;
use agrinode::hub::task::hub_task;
use agrinode::node::commands::NodeCommand;
use agrinode::node::ports::UplinkPort;
use agrinode::sim::SensorState;
use agrinode::telemetry::TelemetrySnapshot;

fn snapshot(cfg: &NodeConfig) -> TelemetrySnapshot {
    // A handmade but fully populated body; contents are irrelevant to the
    // plumbing under test.
    let state = SensorState::initial(cfg);
    serde_json::from_value(serde_json::json!({
        "node_id": cfg.node_id,
        "timestamp_ms": 5000,
        "soil_moisture": {"raw_voltage": state.kalman_voltage, "kalman_filtered_v": state.kalman_voltage, "percentage": 100.0},
        "atmosphere": {"temperature_c": 32.5, "humidity_pct": 45.0},
        "actuators": {"pump_relay_active": state.pump_active, "flow_pulses_counted": state.flow_pulse_count},
        "tinyml_predictions": {"et_forecast_mm_day": 4.2, "wilting_probability_24h": 15.0},
        "computer_vision": {"status": "Healthy", "confidence": 95.0},
        "smfc_power": {"raw_voltage_mv": 800.0, "status": "Charging Battery"},
        "web3_ledger": {"water_saved_liters": state.water_saved_liters, "wct_tokens_minted": state.tokens_minted},
        "edge_security": {"isolation_forest_anomaly": false, "inference_time_ms": 12.4},
        "anti_gravity": {"magnetic_field_ut": 45000.0, "ultrasonic_array_active": false, "clinostat_rpm": 0.0},
        "crop_yield": {"projected_yield_tha": 6.5, "yield_increase_pct": 0.0}
    }))
    .unwrap()
}

#[test]
fn frames_flow_through_relay_and_hub() {
    let cfg = NodeConfig::default();
    let executor: LocalExecutor<'_, 8> = LocalExecutor::new();
    executor.spawn(hub_task(cfg.clone())).detach();
    executor
        .spawn(command_relay_task(
            cfg.command_topic.clone(),
            cfg.clinostat_default_rpm,
        ))
        .detach();

    let scenario = async {
        // Let both tasks start (the relay must subscribe before we publish).
        Timer::after_millis(20).await;

        // Malformed, unknown, and valid frames in sequence; only the valid
        // recognized one reaches the control loop's channel.
        publish_raw(b"\xff\xfe not a frame");
        publish_raw(br#"{"action":"DEFRAGMENT_SOIL"}"#);
        publish_raw(br#"{"action":"ROTATE_CLINOSTAT"}"#);
        let cmd = with_timeout(Duration::from_secs(2), COMMAND_CHANNEL.receive())
            .await
            .expect("relay should deliver the valid command");
        assert_eq!(cmd, NodeCommand::RotateClinostat { rpm: 30.0 });
        assert!(COMMAND_CHANNEL.try_receive().is_err(), "bad frames must be dropped");

        // Uplink round trip through the hub actor.
        let mut client = HubChannelClient::new(0, cfg.ingest_timeout_ms);
        let ack = client
            .ingest(&snapshot(&cfg))
            .await
            .expect("hub task should ack the ingest");
        assert!(!ack.force_pump);

        // The read side sees what the node just posted.
        let mut reader = HubQueryClient::new(1, cfg.ingest_timeout_ms);
        let q = reader.query(Some(10)).await.expect("query should answer");
        assert_eq!(q.cache, "no-store");
        assert!(q.count >= 1);
        assert_eq!(q.records[0].node_id, cfg.node_id);

        let status = reader.status().await.expect("status should answer");
        assert_eq!(status.seconds_to_sleep, cfg.tick_interval_ms / 1000);

        // A manual override rides back on the next ingest, exactly once.
        reader.force_pump().await.expect("override should arm");
        let ack = client.ingest(&snapshot(&cfg)).await.unwrap();
        assert!(ack.force_pump);
        let ack = client.ingest(&snapshot(&cfg)).await.unwrap();
        assert!(!ack.force_pump);

        // Two clients with overlapping round trips: each must get every one
        // of its own responses back even when the hub interleaves them.
        let body = snapshot(&cfg);
        let ingests = async {
            for i in 0..50 {
                client
                    .ingest(&body)
                    .await
                    .unwrap_or_else(|e| panic!("ingest {i} lost its response: {e}"));
            }
        };
        let queries = async {
            for i in 0..50 {
                let q = reader
                    .query(Some(5))
                    .await
                    .unwrap_or_else(|e| panic!("query {i} lost its response: {e}"));
                assert!(q.count >= 1);
            }
        };
        join(ingests, queries).await;
    };
    block_on(executor.run(scenario));
}
