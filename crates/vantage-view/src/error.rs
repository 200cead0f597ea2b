/// Errors surfaced by the visualization layer.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// An external mode string did not name a known visualization mode.
    #[error("unsupported visualization mode: '{0}'")]
    UnsupportedMode(String),

    /// A handle queued for disposal is not live in the registry. The manager
    /// only disposes generations it created itself, so hitting this means an
    /// ownership invariant has been broken, not that the user did anything
    /// wrong.
    #[error("resource disposal invariant violated: handle {0} is not live")]
    ResourceDisposal(u64),
}
