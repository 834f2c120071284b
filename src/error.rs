use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Readiness timeout: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
