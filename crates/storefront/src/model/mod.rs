//! # Order Model
//!
//! - [`order`]: the client-side [`Order`] snapshot and its [`OrderStatus`] lifecycle
//! - [`wire`]: JSON DTOs and decoding

pub mod order;
pub mod wire;

pub use order::{LineItem, Order, OrderId, OrderStatus, ProductId, UserId};
pub use wire::{CreateOrderRequest, OrderItemRequest, OrderItemResponse, OrderResponse};
