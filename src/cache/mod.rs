//! In-memory memoization for upstream API calls
//!
//! This module provides a bounded, time-expiring cache that deduplicates
//! repeated calls to an expensive async operation. Entries are keyed by the
//! call's canonical argument set, expire lazily after a TTL, and are evicted
//! first-in-first-out when the table exceeds its capacity.

mod key;
mod memo;

pub use key::CallKey;
pub use memo::{Emptiness, MemoCache};
