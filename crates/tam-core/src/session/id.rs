use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const SESSION_PREFIX: &str = "chat_";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Client-minted session identifier: `chat_<unix millis>_<9 base36 chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mints a fresh id from the current time and the thread-local RNG.
    pub fn mint() -> Self {
        Self::mint_with(
            chrono::Utc::now().timestamp_millis(),
            &mut rand::thread_rng(),
        )
    }

    /// Mints an id from an explicit timestamp and random source.
    pub fn mint_with<R: Rng + ?Sized>(millis: i64, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{}{}_{}", SESSION_PREFIX, millis, suffix))
    }

    /// Wraps an id received from elsewhere (e.g. restored from a log).
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_minted_id_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = SessionId::mint_with(1_700_000_000_123, &mut rng);

        let rest = id.as_str().strip_prefix("chat_1700000000123_").unwrap();
        assert_eq!(rest.len(), 9);
        assert!(rest.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_consecutive_ids_differ() {
        let first = SessionId::mint();
        let second = SessionId::mint();
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("chat_"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = SessionId::from_raw("chat_1_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"chat_1_abc\"");
    }
}
