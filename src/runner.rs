pub mod api;
pub mod call_state;
pub mod chain;
pub mod config;
pub mod debug_tag;
pub mod diagnostics;
pub mod dispatch;
pub mod ds;
