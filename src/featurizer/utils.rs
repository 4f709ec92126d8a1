//! Session ingestion helpers.
//!
//! Sessionization itself happens upstream; what arrives here is a JSON dump
//! of sessions, each an endpoint pair plus its `[timestamp, hex]` packet
//! records. Loading turns that dump into the ordered [SessionMap] the
//! aggregator consumes.
use super::containers::{SessionDump, SessionKey, SessionMap};
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read session dump: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse session dump: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a sessionizer JSON dump into a [SessionMap].
///
/// Duplicate endpoint pairs in the dump are merged by appending packets, so
/// a sessionizer that flushes in chunks still produces one session per key.
pub fn load_file(path: &str) -> Result<SessionMap, LoadError> {
    log::info!("Loading session dump from {path}.");

    let raw = fs::read_to_string(path)?;
    let dumps: Vec<SessionDump> = serde_json::from_str(&raw)?;

    let mut sessions = SessionMap::new();
    for dump in dumps {
        let key = SessionKey::new(&dump.endpoints.0, &dump.endpoints.1);
        sessions.entry(key).or_default().extend(dump.packets);
    }

    let timestamps = sessions
        .values()
        .flatten()
        .map(|record| record.timestamp())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), ts| {
            (lo.min(ts), hi.max(ts))
        });
    if timestamps.0.is_finite() {
        log::info!(
            "Loaded {} sessions spanning {:.1}s.",
            sessions.len(),
            timestamps.1 - timestamps.0
        );
    } else {
        log::info!("Loaded {} sessions.", sessions.len());
    }
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_dump() {
        let raw = r#"[
            {"endpoints": ["192.168.1.5:80", "192.168.1.10:4000"],
             "packets": [[1618000000.25, "ffeeddccbbaa00115566778808004500"]]},
            {"endpoints": ["192.168.1.5:80", "192.168.1.10:4000"],
             "packets": [[1618000001.5, "ffeeddccbbaa00115566778808004500"]]}
        ]"#;

        let dumps: Vec<SessionDump> = serde_json::from_str(raw).unwrap();
        let mut sessions = SessionMap::new();
        for dump in dumps {
            let key = SessionKey::new(&dump.endpoints.0, &dump.endpoints.1);
            sessions.entry(key).or_default().extend(dump.packets);
        }

        assert_eq!(sessions.len(), 1);
        let session = sessions
            .get(&SessionKey::new("192.168.1.5:80", "192.168.1.10:4000"))
            .unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session[0].timestamp(), 1618000000.25);
    }

    #[test]
    fn test_load_file_missing() {
        assert!(matches!(
            load_file("/definitely/not/here.json"),
            Err(LoadError::Io(_))
        ));
    }
}
