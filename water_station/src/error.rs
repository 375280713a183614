use des::DesError;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Scheduling(#[from] DesError),
}

impl SimError {
    pub fn config(reason: impl Into<String>) -> Self {
        SimError::Configuration(reason.into())
    }
}
