//! HTTP API: server wiring, routing, and request/response mapping for the
//! inventory reservation service.

pub mod app;
pub mod config;
pub mod middleware;
