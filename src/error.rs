use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A renderer session could not produce a page.
///
/// Never retried inside the pipeline. The caller decides whether to retry the
/// whole item or give up on it.
#[derive(Debug, Error)]
pub enum RenderFault {
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("page script failed: {0}")]
    Script(#[source] BoxError),

    #[error("could not read the rendered document: {0}")]
    Document(#[source] BoxError),

    #[error("gave up on {url} after {after:?}")]
    Timeout { url: String, after: Duration },
}

impl RenderFault {
    pub fn navigation(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        RenderFault::Navigation {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Records accumulated by a pagination walk that was cut short by a fault.
#[derive(Debug)]
pub struct PartialWalk<T> {
    pub records: Vec<T>,
    pub fault: RenderFault,
}

/// Why a single item did not make it to persistence.
#[derive(Debug, Error)]
pub enum ItemFault {
    #[error(transparent)]
    Render(#[from] RenderFault),

    #[error("review walk aborted after {collected} reviews: {fault}")]
    Reviews {
        collected: usize,
        #[source]
        fault: RenderFault,
    },

    #[error("persistence failed: {0:#}")]
    Persistence(anyhow::Error),
}
