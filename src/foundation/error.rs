/// Alias for `Result` with [`VoxgridError`].
pub type VoxgridResult<T> = Result<T, VoxgridError>;

/// Errors surfaced by grid building, configuration, and transitions.
#[derive(thiserror::Error, Debug)]
pub enum VoxgridError {
    /// A mask image or video could not be resolved or decoded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// A config, param set, or tween spec failed its bounds checks.
    #[error("validation error: {0}")]
    Validation(String),

    /// A selection named a grid id that does not exist.
    #[error("selection error: {0}")]
    Selection(String),

    /// A selection arrived while a transition was still in flight.
    #[error("busy: {0}")]
    Busy(String),

    /// Anything else, carried with its full source chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VoxgridError {
    /// Build a [`VoxgridError::AssetLoad`] from a message.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`VoxgridError::Validation`] from a message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VoxgridError::Selection`] from a message.
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Build a [`VoxgridError::Busy`] from a message.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }
}
