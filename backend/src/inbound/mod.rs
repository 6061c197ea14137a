//! Inbound adapters translating external requests into domain port calls.
//!
//! HTTP is the only transport; framework types stay inside [`http`].

pub mod http;
