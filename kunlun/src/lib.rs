//! Poll client for the Kunlun monitor backend.

pub mod app;
pub mod config;
pub mod profiles;
pub mod source;
pub mod view;
