/// Boxed error from an external collaborator.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Failures raised while turning placements into a document.
///
/// These never affect the placements themselves; rendering can be retried
/// without regenerating or re-laying-out the batch.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The symbol encoder rejected an identifier.
    #[error("failed to encode symbol for {identifier}: {source}")]
    Encode { identifier: String, source: BoxError },

    /// A page canvas call failed.
    #[error("canvas {operation} failed: {source}")]
    Canvas {
        operation: &'static str,
        source: BoxError,
    },

    /// An encoding worker thread panicked.
    #[error("symbol encoding worker panicked")]
    WorkerPanicked,
}
