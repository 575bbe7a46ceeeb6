use crate::io::IoError;

#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    #[error("Unrecoverable structure: {diagnostic}")]
    Unrecoverable { diagnostic: String },
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
