//! # Views
//!
//! Screen models for the two places the storefront shows order status. Each view owns a
//! poller for as long as it is mounted; closing (or dropping) the view stops it.
//!
//! - [`OrdersPage`]: the order list, polled while any order is active
//! - [`OrderDetail`]: a single order, polled until it settles
//! - [`Banner`]: settlement notices raised from status transitions

pub mod banner;
pub mod order_card;
pub mod order_detail;
pub mod orders_page;

pub use banner::Banner;
pub use order_card::render_order_card;
pub use order_detail::OrderDetail;
pub use orders_page::OrdersPage;
