//! Flash deal campaign services, persistence and product locking.

pub mod context;
pub mod database;
pub mod domain;
pub mod locks;
pub mod memory;

#[cfg(test)]
mod test;

pub mod uuids;
