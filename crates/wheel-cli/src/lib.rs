//! Library components for the wheel import CLI.

pub mod logging;
pub mod overrides_doc;
