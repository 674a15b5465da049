//! Extraction adapter boundary: one image in, one structured result out.

mod vision;

use std::path::Path;

use crate::error::ExtractError;
use crate::models::record::SnapshotEntry;

pub use vision::VisionExtractor;

/// Boundary to the external vision model.
///
/// The production implementation calls a remote API; tests inject a
/// stub so the pipeline can run without network access.
#[allow(async_fn_in_trait)]
pub trait Extractor {
    /// Extract structured invoice data from one image.
    async fn extract(&self, image: &Path) -> Result<SnapshotEntry, ExtractError>;
}
