//! Campaign Handlers

pub(crate) mod activate;
pub(crate) mod create;
pub(crate) mod end;
pub(crate) mod get;
pub(crate) mod pause;
pub(crate) mod reconcile;
pub(crate) mod update;
