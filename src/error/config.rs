use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The bot cannot log in without this value. Check the `.env` file or the process
    /// environment for the listed variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}
