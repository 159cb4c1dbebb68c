//! Training-center management backend.
//!
//! This crate provides the server-side core for the training center: the
//! VATSIM Connect login bridge (token exchange, profile reconciliation and
//! browser session issuance) and the reliable delivery queue that mirrors
//! solo authorizations to VATEUD Core without blocking the request path.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod external;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
