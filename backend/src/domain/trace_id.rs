//! Correlation identifier carried by every request.
//!
//! The identifier lives in a Tokio task-local for the lifetime of a request
//! so that [`crate::domain::Error`] payloads and log lines can be matched up.
//! Task-locals do not follow `tokio::spawn`; wrap spawned work in
//! [`TraceId::scope`] again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Header used both to accept a caller-supplied identifier and to echo the
/// active one.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// UUID naming one request.
///
/// # Examples
/// ```
/// use places_backend::domain::TraceId;
///
/// let reused = TraceId::reuse_or_generate(Some("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
/// assert_eq!(reused.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Keep a well-formed caller identifier, otherwise mint a new one.
    ///
    /// The nil UUID is treated as absent.
    #[must_use]
    pub fn reuse_or_generate(incoming: Option<&str>) -> Self {
        incoming
            .and_then(|raw| raw.trim().parse::<Self>().ok())
            .filter(|id| !id.0.is_nil())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
