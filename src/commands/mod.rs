//! CLI command implementations for fortimap.
//!
//! - **score**: score the cycles of a snapshot and write a report
//! - **band**: classify one value into a fortification band
//! - **init**: write a default `.fortimap.toml`

pub mod band;
pub mod init;
pub mod score;

pub use band::handle_band;
pub use init::init_config;
pub use score::{handle_score, ScoreConfig};
