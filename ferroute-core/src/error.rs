use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No path found between origin and destination")]
    PathNotFound,
    #[error("No street vertex found near {0}")]
    VertexNotFound(String),
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Graph updater stopped: {0}")]
    UpdaterStopped(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Unrecoverable error: {0}")]
    UnrecoverableError(&'static str),
}
