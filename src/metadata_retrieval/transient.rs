//! Transient series registration
//!
//! This module provides RAII-based cleanup for series that were registered
//! only to answer a single metadata request.

use super::{SeriesId, SeriesService};
use tracing::{info, warn};

/// Guard for a transiently registered series that removes it on drop
///
/// Removal always preserves media files. Failures during removal are
/// logged and otherwise ignored, since `Drop` cannot report them.
pub(crate) struct TransientRegistration<'a, S>
where
    S: SeriesService,
{
    service: &'a S,
    id: SeriesId,
    title: String,
}

impl<'a, S> TransientRegistration<'a, S>
where
    S: SeriesService,
{
    /// Arms cleanup for the series with the given id
    pub(crate) fn new(service: &'a S, id: SeriesId, title: impl Into<String>) -> Self {
        Self {
            service,
            id,
            title: title.into(),
        }
    }

    pub(crate) fn id(&self) -> SeriesId {
        self.id
    }
}

impl<S> Drop for TransientRegistration<'_, S>
where
    S: SeriesService,
{
    fn drop(&mut self) {
        match self.service.delete_series(self.id, false) {
            Ok(()) => info!(id = self.id, title = %self.title, "Removed transient registration"),
            Err(e) => warn!(
                id = self.id,
                title = %self.title,
                error = %e,
                "Failed to remove transient registration"
            ),
        }
    }
}
