//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the subscriber used by the console binary.
//!
//! ## Configuration
//!
//! The compact format hides the crate/module prefix (`with_target(false)`);
//! every log line carries an `entity_type` field instead. The filter comes from
//! the configured directive if one is given, otherwise from `RUST_LOG`, falling
//! back to `info`.
//!
//! ## What Gets Traced
//!
//! - **Controller lifecycle**: mount, teardown, discarded late results
//! - **Mutations**: `info!` on success, `warn!` with the reason on failure
//! - **Refetches**: list size after every reload, stale results at `debug`
//! - **Service calls**: `#[instrument]` spans around every client request
//!
//! ```bash
//! # Mutation outcomes and refetches
//! RUST_LOG=info admin-console demo
//!
//! # Full payloads and refused commands
//! RUST_LOG=debug admin-console demo
//! ```
//!
//! With `RUST_LOG=info` a create looks like:
//!
//! ```text
//! INFO Controller mounted entity_type="Post"
//! INFO List loaded entity_type="Post" count=3
//! INFO Created entity_type="Post" id=4 size=4
//! INFO Created successfully entity_type="Post" id=4
//! INFO List loaded entity_type="Post" count=4
//! ```
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Later calls are ignored, so tests may call it freely.
pub fn setup_tracing(filter: Option<&str>) {
    let filter = filter
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type replaces module paths
        .compact()
        .try_init();
}
