//! # Order Desk
//!
//! An in-memory stand-in for the order service, so the storefront can run and be tested
//! without a network. The desk is an actor that owns every order; the processor advances
//! placed orders on its own schedule, which the client can only observe by polling.
//!
//! ## Structure
//!
//! - [`actor`]: the [`OrderDesk`] actor and its request handling
//! - [`client`]: [`DeskClient`], also the storefront's [`OrderTransport`](crate::clients::OrderTransport)
//! - [`processor`]: [`OrderProcessor`], the server-side status driver
//! - [`schedule`]: [`DeskSchedule`] and [`SettlementPolicy`]
//! - [`catalog`]: products and their prices
//!
//! ## Usage
//!
//! ```rust
//! use storefront::desk::{self, Catalog, DeskSchedule, OrderProcessor};
//! use storefront::model::{CreateOrderRequest, OrderItemRequest, OrderStatus};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> Result<(), storefront::OrderError> {
//! let (desk, client) = desk::new(Catalog::demo());
//! let (processor, placed) = OrderProcessor::new(32, DeskSchedule::default());
//! tokio::spawn(desk.run(placed));
//! tokio::spawn(processor.run(client.clone()));
//!
//! let request = CreateOrderRequest {
//!     items: vec![OrderItemRequest { product_id: 1, quantity: 2 }],
//! };
//! let order = client.place(request).await?;
//! assert_eq!(order.status, OrderStatus::Pending);
//! assert_eq!(order.total, 3198.0);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod catalog;
pub mod client;
pub mod message;
pub mod processor;
pub mod schedule;

pub use actor::OrderDesk;
pub use catalog::{Catalog, Product};
pub use client::DeskClient;
pub use message::{DeskRequest, Response};
pub use processor::OrderProcessor;
pub use schedule::{DeskSchedule, SettlementPolicy};

/// Creates a new desk actor and its client.
pub fn new(catalog: Catalog) -> (OrderDesk, DeskClient) {
    OrderDesk::new(32, catalog)
}
