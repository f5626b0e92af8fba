//! # System Lifecycle
//!
//! [`StoreSystem`] wires the storefront's background services together and tears them down.
//!
//! ## Wiring
//!
//! The desk and the processor depend on each other: the desk announces placed orders to
//! the processor, and the processor advances them through a [`DeskClient`]. Both are
//! created first and connected when started, through the arguments to their `run`
//! methods:
//!
//! ```rust,ignore
//! let (desk, desk_client) = desk::new(catalog);
//! let (processor, placed) = OrderProcessor::new(32, schedule);
//! tokio::spawn(desk.run(placed));
//! tokio::spawn(processor.run(desk_client.clone()));
//! ```
//!
//! ## Graceful Shutdown
//!
//! Because the processor holds a desk client, dropping clients alone would never close the
//! desk's channel. [`StoreSystem::shutdown`] therefore sends an explicit shutdown request:
//!
//! 1. the desk stops and drops its `placed` sender,
//! 2. the processor sees its channel close and abandons orders still settling,
//! 3. both tasks are awaited.
//!
//! Close views before shutting down; their pollers would otherwise halt on a failed fetch.
//!
//! [`DeskClient`]: crate::desk::DeskClient

pub mod store_system;

pub use crate::desk::{DeskSchedule, SettlementPolicy};
pub use status_sync::tracing::setup_tracing;
pub use store_system::StoreSystem;
