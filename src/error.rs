use thiserror::Error;

/// Failure modes of a single lookup attempt. All of these are absorbed at
/// the controller boundary; none reach the code that triggered the lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("proxy returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("proxy returned a non-JSON body")]
    Parse(#[source] serde_json::Error),

    #[error("no agent name found in proxy response")]
    NoMatch,

    #[error("request to proxy failed")]
    Network(#[source] reqwest::Error),
}
