use chrono::Utc;
use uuid::Uuid;

const SUFFIX_LEN: usize = 7;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a probabilistically unique session id, e.g. `session_1718000000000_k3j9x0a`
pub fn generate_session_id() -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(ALPHABET[(entropy % 36) as usize] as char);
        entropy /= 36;
    }

    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
}
