pub mod error;
pub mod loader;

pub use error::{ConfigError, Result};
pub use loader::{load_config_dir, parse_config_file};
