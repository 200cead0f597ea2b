/// Errors that can occur while loading a model.
///
/// Loading is all-or-nothing: a failed parse never yields a partial scene
/// graph, and the caller's previously installed model is untouched.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported model format: '{0}'")]
    UnsupportedFormat(String),

    #[error("malformed model data: {0}")]
    MalformedData(String),

    #[error("model contains no vertices")]
    EmptyModel,
}

impl LoadError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedData(reason.into())
    }
}
