//! Dayflow client library
//!
//! Typed access to the Dayflow HR API: attendance, employee directory,
//! profiles and time off. Requests carry the stored access token and recover
//! from its expiry with a single shared refresh.

pub mod api;
pub mod auth;
pub mod config;
pub mod filter;
pub mod models;
