use risk_model::{LoadError, ModelArtifact};
use std::path::Path;

/// Trait for models that can be initialized from user-defined arguments.
pub trait Init<InitArgs: ?Sized = ()>: Sized {
    /// Initialize the model from the given arguments.
    fn init(args: &InitArgs) -> Result<Self, LoadError>;
}

impl Init<Path> for ModelArtifact {
    fn init(path: &Path) -> Result<Self, LoadError> {
        ModelArtifact::load(path)
    }
}

impl Init<[u8]> for ModelArtifact {
    fn init(bytes: &[u8]) -> Result<Self, LoadError> {
        ModelArtifact::from_bytes(bytes)
    }
}
