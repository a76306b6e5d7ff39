//! Hireflow: role-aware onboarding service for a recruitment platform.

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod onboarding;
pub mod server;
pub mod store;
