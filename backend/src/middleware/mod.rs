//! Actix middleware applied to every route.
//!
//! [`Trace`] tags each request with a trace identifier that error responses
//! and log lines share.

pub mod trace;

pub use trace::Trace;
