//! Thin HTTP clients for external collaborators.
//!
//! Both clients deliberately flatten failures: the orchestrator and the
//! delivery queue only need to know whether a call produced usable data,
//! not which layer of the network stack misbehaved. The one exception is
//! the provider's revoked-code hint, which callers must be able to tell
//! apart from an outage.

pub mod connect;
pub mod vateud;

/// Per-call timeout for every outbound HTTP request.
pub const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
