//! HTTP surface: handlers, middleware and route wiring

pub mod middleware;
pub mod services;
