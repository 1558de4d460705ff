//! Fuzz target: `HubEngine::dispatch`
//!
//! Throws arbitrary request frames at the hub engine and asserts that it
//! always answers with an encodable response — malformed input must
//! surface as an `Error` response frame, never a panic or a dropped
//! request.
//!
//! cargo fuzz run fuzz_hub_dispatch

#![no_main]

use agrinode::config::NodeConfig;
use agrinode::hub::engine::HubEngine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut engine = HubEngine::new(&NodeConfig::default());
    let response = engine.dispatch(data, 0);
    let frame = HubEngine::encode(&response);
    assert!(
        serde_json::from_slice::<serde_json::Value>(&frame).is_ok(),
        "every response frame must be valid JSON"
    );
});
