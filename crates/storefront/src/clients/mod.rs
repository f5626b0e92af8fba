//! # Clients
//!
//! The storefront talks to the order service through an [`OrderTransport`]: three
//! request/response calls carrying JSON bodies. [`OrderClient`] decodes those bodies into
//! [`Order`](crate::model::Order) snapshots and [`OrderFetcher`] plugs the client into the
//! pollers.

pub mod order_client;
pub mod order_fetcher;
pub mod transport;

pub use order_client::OrderClient;
pub use order_fetcher::OrderFetcher;
pub use transport::OrderTransport;
