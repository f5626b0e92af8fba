//! # Storefront
//!
//! The order side of a small GPU storefront, built on [`status_sync`]. Orders are placed
//! with an in-memory order desk that advances them on its own schedule; the views keep the
//! customer's picture of those orders current by polling.
//!
//! - [`model`]: [`Order`](model::Order), its status lifecycle and wire format
//! - [`clients`]: the transport seam and the fetcher the pollers use
//! - [`desk`]: the in-memory order service and its processor
//! - [`views`]: the orders list and the order detail
//! - [`lifecycle`]: [`StoreSystem`](lifecycle::StoreSystem) startup and shutdown

pub mod clients;
pub mod desk;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod views;

pub use error::OrderError;
