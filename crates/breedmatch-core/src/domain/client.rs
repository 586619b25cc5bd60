use std::fmt;

/// Rate-limit key for a caller.
///
/// Taken from the first entry of a comma-separated forwarded-address header.
/// The value is not checked to be a real address and the header is trusted
/// as sent, so callers behind one proxy share a quota and a caller that forges
/// the header gets a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    pub const UNKNOWN: &'static str = "unknown";

    /// Derive the identifier from a raw `X-Forwarded-For` value.
    pub fn from_forwarded_for(header: Option<&str>) -> Self {
        let first = header
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match first {
            Some(id) => Self(id.to_string()),
            None => Self::unknown(),
        }
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
