//! Utility modules

pub mod domain_name;
pub mod keyed_lock;
pub mod token;

pub use keyed_lock::{KeyedLockGuard, KeyedLocks};
