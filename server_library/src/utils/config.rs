use crate::utils::logging::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH: &str = "./server.toml";

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub http_server_bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub upload_folder: String, //path
    pub results_folder: String, //path
    pub static_folder: String, //path
    pub history_file: String, //path
    pub model_path: String, //path
    pub confidence_threshold: f32, //0..1
    pub iou_threshold: f32, //0..1
    pub max_upload_size: usize, //bytes
    pub font_path: String, //path
    pub font_size: f32, //points
    pub border_width: u32, //pixels
    pub border_color: [u8; 3], //RGB
    pub text_color: [u8; 3], //RGB
    pub report_recent_entries: usize,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SystemEntry> {
        let toml_string = fs::read_to_string(path).map_err(SystemEntry::ConfigNotFound)?;
        Self::parse(&toml_string)
    }

    pub fn parse(toml_string: &str) -> Result<Self, SystemEntry> {
        let config = toml::from_str::<ConfigTable>(toml_string)
            .map_err(SystemEntry::ConfigParseError)?
            .config;
        if !Self::validate(&config) {
            return Err(SystemEntry::InvalidConfig);
        }
        Ok(config)
    }

    pub fn validate(config: &Config) -> bool {
        Config::validate_second(config.bind_retry_duration)
            && Config::validate_ratio(config.confidence_threshold)
            && Config::validate_ratio(config.iou_threshold)
            && Config::validate_upload_size(config.max_upload_size)
            && Config::validate_font_size(config.font_size)
            && Config::validate_border_width(config.border_width)
            && Config::validate_recent_entries(config.report_recent_entries)
            && Config::validate_folders(config)
    }

    pub fn upload_folder(&self) -> PathBuf {
        PathBuf::from(&self.upload_folder)
    }

    pub fn results_folder(&self) -> PathBuf {
        PathBuf::from(&self.results_folder)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_ratio(value: f32) -> bool {
        (0.0..=1.0).contains(&value)
    }

    fn validate_upload_size(size: usize) -> bool {
        size > 0
    }

    fn validate_border_width(width: u32) -> bool {
        width > 0_u32
    }

    fn validate_font_size(size: f32) -> bool {
        size > 0_f32
    }

    fn validate_recent_entries(count: usize) -> bool {
        count > 0
    }

    fn validate_folders(config: &Config) -> bool {
        !config.upload_folder.is_empty()
            && !config.results_folder.is_empty()
            && !config.history_file.is_empty()
            && !config.model_path.is_empty()
    }
}
