//! Job search: query formatting and the TheirStack client.

pub mod client;
pub mod query;
