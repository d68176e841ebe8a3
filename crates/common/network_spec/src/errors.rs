use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NetworkSpecError {
    #[error("network parameter {0} must be greater than zero")]
    ZeroParameter(&'static str),
    #[error("failed to read network spec {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse network spec YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}
