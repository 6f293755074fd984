mod atlas_error;
mod classifier_error;
mod consolidation_error;
mod store_error;

pub use atlas_error::{AtlasError, AtlasResult};
pub use classifier_error::ClassifierError;
pub use consolidation_error::ConsolidationError;
pub use store_error::StoreError;
