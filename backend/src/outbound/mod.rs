//! Outbound adapters implementing domain ports.
//!
//! - **cache**: in-process isochrone response cache with TTL and capacity
//! - **metrics**: Prometheus exporters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
#[cfg(feature = "metrics")]
pub mod metrics;
