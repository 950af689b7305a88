//! Reference snapshot source: reports this host's counters over HTTP.

pub mod collect;
pub mod config;
pub mod http;
pub mod proc;
pub mod state;
