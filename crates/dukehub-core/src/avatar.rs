/// Produces the default avatar reference for a new account.
///
/// The same seed must always yield the same reference.
pub trait AvatarGenerator: Send + Sync {
    fn avatar_for(&self, seed: &str) -> String;
}

/// Initials avatars served by DiceBear.
#[derive(Debug, Clone)]
pub struct InitialsAvatars {
    base_url: String,
}

impl InitialsAvatars {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.dicebear.com/7.x/initials/svg";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for InitialsAvatars {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl AvatarGenerator for InitialsAvatars {
    fn avatar_for(&self, seed: &str) -> String {
        format!("{}?seed={}", self.base_url, encode_query_value(seed))
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
