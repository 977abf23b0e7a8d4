//! Hot-path conversation handling for Dossier.
//!
//! Everything here runs synchronously inside the request serving a turn:
//! buffer the turn, decide whether it is worth analyzing, hand the analysis
//! to the cold path without waiting, and generate the reply from recent
//! context. A recency-store failure is fatal to the request; a cold-path
//! failure is invisible.

pub mod config;
pub mod gate;
pub mod service;

pub use config::{RecencyConfig, ServerConfig, ServiceConfig};
pub use gate::{should_extract, MIN_WORDS_FOR_EXTRACTION};
pub use service::ChatService;
