use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read lexicon file {path}: {source}")]
    LexiconFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lexicon file: {0}")]
    LexiconFileParse(#[from] serde_yaml::Error),

    #[error("lexicon validation failed: {0}")]
    Validation(String),
}
