mod memory;
mod storage;

pub use memory::InMemoryCredentialStore;
pub use storage::CredentialStore;

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "readmegen_session";

/// Create a new session id
pub fn create_session_id() -> String {
    Uuid::new_v4().to_string()
}

const SHA256_BLOCK: usize = 64;

/// HMAC-SHA256 (RFC 2104) over `message`.
fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut block = [0u8; SHA256_BLOCK];
    if key.len() > SHA256_BLOCK {
        block[..32].copy_from_slice(&Sha256::digest(key));
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let inner_pad: Vec<u8> = block.iter().map(|b| b ^ 0x36).collect();
    let outer_pad: Vec<u8> = block.iter().map(|b| b ^ 0x5c).collect();

    let inner = Sha256::new()
        .chain_update(&inner_pad)
        .chain_update(message)
        .finalize();
    Sha256::new()
        .chain_update(&outer_pad)
        .chain_update(inner)
        .finalize()
        .into()
}

fn signature(secret: &str, session_id: &str) -> String {
    hex::encode(hmac_sha256(secret.as_bytes(), session_id.as_bytes()))
}

/// Equality whose running time depends only on the lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Cookie value `<id>.<signature>` for a session id.
pub fn sign_session_id(secret: &str, session_id: &str) -> String {
    format!("{}.{}", session_id, signature(secret, session_id))
}

/// Session id from a signed cookie value, if the signature matches.
pub fn verify_session_cookie(secret: &str, value: &str) -> Option<String> {
    let (session_id, provided) = value.rsplit_once('.')?;
    if session_id.is_empty() {
        return None;
    }

    let expected = signature(secret, session_id);
    constant_time_eq(expected.as_bytes(), provided.as_bytes()).then(|| session_id.to_string())
}

/// Find `name` in a `Cookie` request header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// `Set-Cookie` value for a freshly created session.
pub fn session_cookie_header(signed_value: &str, ttl_minutes: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        signed_value,
        ttl_minutes * 60
    )
}
