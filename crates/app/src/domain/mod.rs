//! Flashdeal Domain Concerns

pub mod campaigns;
pub mod errors;
pub mod products;
