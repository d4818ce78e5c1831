//! Shared value types for the marketplace backend.
//!
//! Provides the identifier newtypes used across crates, the fixed-point
//! [`Money`] type, and the optimistic-concurrency [`Version`] counter.

pub mod ids;
pub mod money;
pub mod version;

pub use ids::{AuditId, OrderId, ProductId, UserId};
pub use money::Money;
pub use version::Version;
