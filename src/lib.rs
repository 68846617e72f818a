//! Pizzeria
//!
//! Ordering core for a pizzeria storefront: the menu loaded from published
//! sheets, a cart of whole and half pizzas, combo pricing, and orders sent as
//! a pre-filled WhatsApp message with a best-effort Google Forms log.

pub mod cart;
pub mod catalog;
pub mod combos;
pub mod dispatch;
pub mod fixtures;
pub mod order;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod schedule;
pub mod summary;
