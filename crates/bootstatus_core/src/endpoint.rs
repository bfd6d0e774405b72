use thiserror::Error;
use url::Url;

use crate::STATUS_PATH;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("page url has unsupported scheme {0}")]
    UnsupportedScheme(String),
    #[error("page url has no host")]
    MissingHost,
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Status document next to the page.
pub fn status_url(page: &Url) -> Result<Url, EndpointError> {
    Ok(page.join(STATUS_PATH)?)
}

/// Push endpoint: same host and directory as the page, ws(s) scheme, suffixed with `/status`.
pub fn push_channel_url(page: &Url) -> Result<Url, EndpointError> {
    let scheme = match page.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => return Err(EndpointError::UnsupportedScheme(other.to_owned())),
    };
    let host = page.host_str().ok_or(EndpointError::MissingHost)?;
    let authority = match page.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };

    let path = page.path();
    let directory = match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    };

    Ok(Url::parse(&format!("{scheme}://{authority}{directory}/status"))?)
}
