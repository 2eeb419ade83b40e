use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Upstream Error: {message}")]
    Upstream {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("HTTP Client Error: {0}")]
    HttpClient(String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("File I/O Error: {0}")]
    Io(String),

    #[error("Render Error: {0}")]
    Render(String),
}

impl AppError {
    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
            source: None,
        }
    }

    pub fn upstream_with(message: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Upstream {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::Configuration(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Upstream { .. })
    }
}

// Allow conversion from std::io::Error to AppError::Io
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Render(err.to_string())
    }
}
