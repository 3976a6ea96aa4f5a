// Artifact reference grammars

use std::fmt;
use thiserror::Error;

pub const LOCAL_SCHEME: &str = "local-artifact";
pub const REMOTE_SCHEME: &str = "wandb-artifact";
pub const LATEST_VERSION: &str = "latest";
pub const DEFAULT_PATH: &str = "obj";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("unsupported reference scheme in {uri}")]
    UnsupportedScheme { uri: String },
    #[error("malformed {scheme} reference: {uri}")]
    Malformed { scheme: &'static str, uri: String },
}

/// A parsed artifact reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactUri {
    /// `local-artifact:///<name>:<version>[/<path>]`
    Local {
        name: String,
        version: String,
        path: Option<String>,
    },
    /// `wandb-artifact:///<entity>/<project>/<name>:<version>[/<path>]`
    Remote {
        entity: String,
        project: String,
        name: String,
        version: String,
        path: Option<String>,
    },
}

impl ArtifactUri {
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        if let Some(rest) = strip_scheme(uri, LOCAL_SCHEME) {
            let rest = rest?;
            let (name, version, path) = split_name_version(rest).ok_or_else(|| UriError::Malformed {
                scheme: LOCAL_SCHEME,
                uri: uri.to_string(),
            })?;
            return Ok(ArtifactUri::Local { name, version, path });
        }

        if let Some(rest) = strip_scheme(uri, REMOTE_SCHEME) {
            let rest = rest?;
            let malformed = || UriError::Malformed {
                scheme: REMOTE_SCHEME,
                uri: uri.to_string(),
            };
            let mut parts = rest.splitn(3, '/');
            let entity = non_empty(parts.next()).ok_or_else(malformed)?;
            let project = non_empty(parts.next()).ok_or_else(malformed)?;
            let (name, version, path) =
                split_name_version(parts.next().unwrap_or_default()).ok_or_else(malformed)?;
            return Ok(ArtifactUri::Remote {
                entity,
                project,
                name,
                version,
                path,
            });
        }

        Err(UriError::UnsupportedScheme {
            uri: uri.to_string(),
        })
    }

    /// Local reference to the newest version of `name`
    pub fn local_latest(name: &str) -> Self {
        ArtifactUri::Local {
            name: name.to_string(),
            version: LATEST_VERSION.to_string(),
            path: Some(DEFAULT_PATH.to_string()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ArtifactUri::Local { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ArtifactUri::Remote { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            ArtifactUri::Local { name, .. } | ArtifactUri::Remote { name, .. } => name,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            ArtifactUri::Local { version, .. } | ArtifactUri::Remote { version, .. } => version,
        }
    }
}

impl fmt::Display for ArtifactUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = match self {
            ArtifactUri::Local { name, version, path } => {
                write!(f, "{LOCAL_SCHEME}:///{name}:{version}")?;
                path
            }
            ArtifactUri::Remote {
                entity,
                project,
                name,
                version,
                path,
            } => {
                write!(f, "{REMOTE_SCHEME}:///{entity}/{project}/{name}:{version}")?;
                path
            }
        };
        match path {
            Some(path) => write!(f, "/{path}"),
            None => Ok(()),
        }
    }
}

impl std::str::FromStr for ArtifactUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactUri::parse(s)
    }
}

/// Body after `<scheme>:///`, or `None` when `uri` uses another scheme
fn strip_scheme<'a>(uri: &'a str, scheme: &'static str) -> Option<Result<&'a str, UriError>> {
    let rest = uri.strip_prefix(scheme)?.strip_prefix(':')?;
    Some(rest.strip_prefix("///").ok_or_else(|| UriError::Malformed {
        scheme,
        uri: uri.to_string(),
    }))
}

fn non_empty(part: Option<&str>) -> Option<String> {
    part.filter(|p| !p.is_empty()).map(str::to_string)
}

// "<name>:<version>[/<path>]"
fn split_name_version(rest: &str) -> Option<(String, String, Option<String>)> {
    let (head, path) = match rest.split_once('/') {
        Some((head, path)) => (head, non_empty(Some(path))),
        None => (rest, None),
    };
    let (name, version) = head.split_once(':')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name.to_string(), version.to_string(), path))
}
