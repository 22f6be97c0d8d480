use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::record::{ConnectionRecord, NetworkPayload};

const RECORD_LIST_KEYS: [&str; 3] = ["networkData", "network_data", "connections"];
const ARTIST_KEYS: [&str; 3] = ["artistName", "artist_name", "artist"];

/// Parses either a bare array of connection records or an object wrapping one.
///
/// Records that fail to deserialize are skipped with a warning; only a payload without any
/// record list is an error. An empty list is a valid, empty network.
pub fn parse_network_payload(raw: &str) -> Result<NetworkPayload> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in network payload")?;

    match parsed {
        Value::Array(entries) => Ok(NetworkPayload {
            artist: None,
            connections: parse_records(&entries),
        }),
        Value::Object(object) => {
            let entries = RECORD_LIST_KEYS
                .iter()
                .find_map(|key| object.get(*key))
                .ok_or_else(|| anyhow!("network payload has no networkData list"))?
                .as_array()
                .ok_or_else(|| anyhow!("networkData is not a JSON array"))?;

            let artist = ARTIST_KEYS
                .iter()
                .find_map(|key| object.get(*key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned);

            Ok(NetworkPayload {
                artist,
                connections: parse_records(entries),
            })
        }
        _ => Err(anyhow!("unexpected JSON type for network payload")),
    }
}

fn parse_records(entries: &[Value]) -> Vec<ConnectionRecord> {
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match ConnectionRecord::deserialize(entry) {
            Ok(record) => records.push(record),
            Err(error) => {
                tracing::warn!(index, %error, "skipping malformed connection record");
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let payload = parse_network_payload(
            r#"[{"name": "Gauguin", "score": 9}, {"name": "Bernard", "score": 3}]"#,
        )
        .unwrap();

        assert_eq!(payload.artist, None);
        assert_eq!(payload.connections.len(), 2);
        assert_eq!(payload.connections[1].name, "Bernard");
    }

    #[test]
    fn parses_wrapped_payload_with_artist() {
        let payload = parse_network_payload(
            r#"{"artistName": " Van Gogh ", "networkData": [{"connected_entity_name": "Theo"}]}"#,
        )
        .unwrap();

        assert_eq!(payload.artist.as_deref(), Some("Van Gogh"));
        assert_eq!(payload.connections, vec![ConnectionRecord::new("Theo")]);
    }

    #[test]
    fn skips_malformed_records() {
        let payload =
            parse_network_payload(r#"[{"name": "Theo"}, {"summary": "no name"}, 42]"#).unwrap();
        assert_eq!(payload.connections.len(), 1);
    }

    #[test]
    fn empty_list_is_valid() {
        let payload = parse_network_payload(r#"{"networkData": []}"#).unwrap();
        assert!(payload.connections.is_empty());
    }

    #[test]
    fn rejects_payload_without_records() {
        assert!(parse_network_payload(r#"{"timelineEvents": []}"#).is_err());
        assert!(parse_network_payload(r#""Van Gogh""#).is_err());
        assert!(parse_network_payload("not json").is_err());
    }
}
