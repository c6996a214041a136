//! Conversion of server-side history into transcript entries.

use chrono::{DateTime, NaiveDateTime, Utc};
use supportchat_types::{HistoryMessage, Message, Role};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// The server has no per-message ids, so they are derived as `<role>_<index>_<millis>`
pub fn history_to_messages(entries: &[HistoryMessage]) -> Vec<Message> {
    let stamp = Utc::now().timestamp_millis();

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let role = entry.role.parse::<Role>().unwrap_or_else(|e| {
                log::warn!("{} in history, keeping it as an assistant message", e);
                Role::Assistant
            });

            Message {
                id: format!("{}_{}_{}", entry.role.trim().to_lowercase(), index, stamp),
                role,
                content: entry.content.clone(),
                timestamp: parse_created_at(&entry.created_at),
                sources: None,
            }
        })
        .collect()
}

/// RFC 3339, or a zone-less timestamp taken as UTC
pub fn parse_created_at(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc();
        }
    }

    log::warn!("Unparsable created_at \"{}\", using current time", raw);
    Utc::now()
}
