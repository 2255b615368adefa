use std::sync::Arc;
use osn_core::{ContentAnalyzer, Error, Result};
use crate::Config;

pub mod dummy;
pub mod siliconflow;

pub use dummy::DummyModel;
pub use siliconflow::SiliconFlowModel;

pub const AVAILABLE_MODELS: &[&str] = &["siliconflow", "dummy"];

/// Build the analyzer named on the command line.
pub fn create_model(name: &str, config: Config) -> Result<Arc<dyn ContentAnalyzer>> {
    match name.to_lowercase().as_str() {
        "siliconflow" | "openai" => Ok(Arc::new(SiliconFlowModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown model '{}'. Available models: {}",
            other,
            AVAILABLE_MODELS.join(", ")
        ))),
    }
}
