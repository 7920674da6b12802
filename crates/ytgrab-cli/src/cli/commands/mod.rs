//! CLI command handlers. Each command is in its own file for clarity.

mod checksum;
mod config;
mod playlist;
mod probe;
mod video;

pub use checksum::run_checksum;
pub use config::run_config;
pub use playlist::run_playlist;
pub use probe::run_probe;
pub use video::run_video;
