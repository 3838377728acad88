pub mod toml_config;

pub use toml_config::{ClientConfig, OutputConfig, ReportSection, TomlConfig};
