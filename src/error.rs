use thiserror::Error;

/// Failures raised while resolving and aggregating click metrics.
///
/// Structural problems with upstream payloads carry the offending fragment,
/// upstream failures carry the URL (never the token).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid group data from upstream: {0}")]
    InvalidGroupData(String),

    #[error("invalid link data from upstream: {0}")]
    InvalidLinkData(String),

    #[error("invalid metrics data from upstream: {0}")]
    InvalidMetricsData(String),

    #[error("malformed bitlink url '{0}': missing scheme delimiter")]
    MalformedLink(String),

    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamHttp { status: u16, url: String },

    #[error("malformed upstream response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("upstream request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// True for failures caused by upstream data that could not be used.
    pub fn is_invalid_data(&self) -> bool {
        matches!(
            self,
            Error::InvalidGroupData(_)
                | Error::InvalidLinkData(_)
                | Error::InvalidMetricsData(_)
                | Error::MalformedLink(_)
                | Error::MalformedResponse { .. }
        )
    }

    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { source, .. } if source.is_timeout())
    }
}
