pub type CutlineResult<T> = Result<T, CutlineError>;

#[derive(thiserror::Error, Debug)]
pub enum CutlineError {
    #[error("open failure: {0}")]
    OpenFailure(String),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("resample error: {0}")]
    Resample(String),

    #[error("plugin load failure: {0}")]
    PluginLoad(String),

    #[error("plugin symbol missing: {0}")]
    PluginSymbol(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutlineError {
    pub fn open_failure(msg: impl Into<String>) -> Self {
        Self::OpenFailure(msg.into())
    }

    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn resample(msg: impl Into<String>) -> Self {
        Self::Resample(msg.into())
    }

    pub fn plugin_load(msg: impl Into<String>) -> Self {
        Self::PluginLoad(msg.into())
    }

    pub fn plugin_symbol(msg: impl Into<String>) -> Self {
        Self::PluginSymbol(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let err = CutlineError::open_failure("no such file");
        assert_eq!(err.to_string(), "open failure: no such file");

        let err = CutlineError::invalid_argument("duration must be >= 0");
        assert_eq!(err.to_string(), "invalid argument: duration must be >= 0");
    }

    #[test]
    fn anyhow_errors_pass_through() {
        let err: CutlineError = anyhow::anyhow!("backend exploded").into();
        assert_eq!(err.to_string(), "backend exploded");
    }
}
