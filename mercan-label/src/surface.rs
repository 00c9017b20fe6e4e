//! Print surfaces
//!
//! A surface receives one finished document per print call and is not
//! managed beyond that. The shipped implementation spools documents to
//! a directory; the embedding application brings its own surface for a
//! real display or printer dialog.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument};

use crate::render::PrintDocument;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Target that can take a rendered print document
#[allow(async_fn_in_trait)]
pub trait PrintSurface {
    /// Hand over a finished document
    async fn present(&self, document: &PrintDocument) -> SurfaceResult<()>;
}

/// Spools documents into a directory as `<job_id>.html`
#[derive(Debug, Clone)]
pub struct FileSurface {
    dir: PathBuf,
}

impl FileSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Spool path for a document
    pub fn path_for(&self, document: &PrintDocument) -> PathBuf {
        self.dir.join(format!("{}.html", document.job_id))
    }
}

impl PrintSurface for FileSurface {
    #[instrument(skip(self, document), fields(job_id = %document.job_id, pages = document.page_count))]
    async fn present(&self, document: &PrintDocument) -> SurfaceResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(document);
        tokio::fs::write(&path, &document.html).await?;
        info!(path = %path.display(), "print document spooled");
        Ok(())
    }
}
