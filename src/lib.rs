pub mod api;
pub mod config;
pub mod device;
pub mod ergonomics;
pub mod error;
pub mod export;
pub mod keycodes;
pub mod optimizer;
pub mod patterns;
pub mod simulator;
pub mod snapshot;
pub mod timing;
// cmd and reports are modules of the binary crate (main).
