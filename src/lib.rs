#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod catalog;
pub mod config;
pub mod control;
pub mod facet;
pub mod import;
pub mod leads;
pub mod query;
pub mod store;
pub mod uploader;
