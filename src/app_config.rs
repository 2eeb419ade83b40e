use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApplicationConfig {
    pub log_level: Option<String>, // Optional so the CLI --debug flag can take precedence
    pub output_directory: String,  // Where rendered player pages are written
    pub filename_timestamp_format: String, // strftime format string
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            log_level: Some("info".to_string()),
            output_directory: "./output".to_string(),
            filename_timestamp_format: "%Y%m%d_%H%M%S".to_string(),
        }
    }
}
