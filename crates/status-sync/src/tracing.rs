//! # Logging
//!
//! Pollers log through `tracing` with structured fields instead of formatted messages, so a
//! line reads `INFO Status changed entity_type="Order" id=42 from=PENDING to=PROCESSING`.
//! Every event carries `entity_type` (the last segment of the Rust type name); single-entity
//! events also carry `id`.
//!
//! | Level   | Events                                                          |
//! |---------|-----------------------------------------------------------------|
//! | `INFO`  | poller start and shutdown, timer armed/disarmed, status changes |
//! | `WARN`  | failed fetches (the poller halts)                               |
//! | `DEBUG` | every fetch result, mutations, refused resumes                  |
//!
//! ```bash
//! RUST_LOG=info cargo run -p storefront
//! RUST_LOG=status_sync=debug,storefront=info cargo run -p storefront
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Module paths are hidden (`with_target(false)`); the `entity_type` field identifies the
/// source instead. Calling this more than once is harmless: only the first call installs.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
