//! Name search scoped to one tenant.

use std::sync::Arc;

use tracing::debug;

use treehub_core::result::AppResult;
use treehub_database::FileStore;
use treehub_entity::file::File;

/// Case-insensitive file name search.
#[derive(Clone)]
pub struct SearchService {
    /// File store.
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService").finish_non_exhaustive()
    }
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }

    /// Files of `owner` whose name contains `substring`, ignoring case.
    ///
    /// The substring is matched literally. An empty substring matches
    /// every file of the owner. Results are ordered by name, ignoring
    /// case.
    pub async fn search(&self, owner: &str, substring: &str) -> AppResult<Vec<File>> {
        let hits = self.files.search(owner, substring).await?;
        debug!(owner = %owner, query = %substring, hits = hits.len(), "File search");
        Ok(hits)
    }
}
