//! Authentication service layer.
//!
//! Handles the VATSIM Connect login flow end to end: code exchange,
//! profile fetch, scope and suspension checks, identity reconciliation and
//! session replacement.

pub mod login;
pub mod session;
