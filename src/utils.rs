use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Formats a duration as `m:ss`.
pub fn format_duration(minutes: u64, seconds: u64) -> String {
    format!("{minutes}:{seconds:02}")
}

/// Accepts either a bare playlist id or a Spotify playlist URL / URI.
pub fn parse_playlist_id(input: &str) -> String {
    let input = input.trim();
    if let Some(rest) = input.strip_prefix("spotify:playlist:") {
        return rest.to_string();
    }
    if let Some((_, rest)) = input.split_once("/playlist/") {
        return rest
            .split(['?', '/', '#'])
            .next()
            .unwrap_or(rest)
            .to_string();
    }
    input.to_string()
}
