//! Middleware stack for the Serial Verify Service.

pub mod cors;

pub use cors::access_filter;
