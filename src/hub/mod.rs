//! Telemetry hub — the cloud-side ingestion and retrieval service.
//!
//! Nodes post partial snapshots; the hub fills in defaults, re-stamps them
//! at arrival, appends them to a retention-capped log, and answers each
//! ingest with any pending manual-override directive. Dashboards and the
//! AR overlay read the same log back out.
//!
//! [`task::hub_task`] is the only owner of the store, so every request is
//! serialized through one actor and the force-pump flag is handed to
//! exactly one ingest.

pub mod engine;
pub mod schema;
pub mod store;
pub mod task;
