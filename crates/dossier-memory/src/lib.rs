//! Hot-path recency buffer for Dossier sessions.
//!
//! Every conversational turn lands here synchronously; the buffer keeps only
//! the most recent turns per session and lets the whole session expire after
//! a day of inactivity. The backing store is a seam: Redis in production,
//! an in-process store for tests and single-node deployments.
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 RecencyBuffer                    │
//! │   append / read / info / clear  (cap 20, 24h)    │
//! └───────────────────────┬──────────────────────────┘
//!                         │ RecencyStore trait
//!          ┌──────────────┴───────────────┐
//!          ▼                              ▼
//!   RedisRecencyStore            InMemoryRecencyStore
//!   (LPUSH/LTRIM/EXPIRE)         (RwLock + Instant TTL)
//! ```

pub mod buffer;
pub mod in_memory;
pub mod redis_store;
pub mod store;

pub use buffer::{RecencyBuffer, SessionInfo, MAX_TURNS, SESSION_TTL};
pub use in_memory::InMemoryRecencyStore;
pub use redis_store::RedisRecencyStore;
pub use store::RecencyStore;
