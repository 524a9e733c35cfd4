//! Shared types, errors, and configuration for the NSGD ledger.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Operator login payloads and JWT claims
//! - JWT issuing and validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{Claims, LoginRequest, LoginResponse};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
