//! Flashdeal
//!
//! Flashdeal is the scheduling and inventory reservation engine behind time-boxed flash and
//! lightning deals: discount arithmetic, deal window rules, overlap detection between campaigns
//! and the campaign lifecycle state machine.
//!
//! Everything in this crate is pure and synchronous. Persistence, locking and projection
//! synchronisation live in the `flashdeal-app` crate.

pub mod discounts;
pub mod lifecycle;
pub mod overlap;
pub mod prelude;
pub mod window;
