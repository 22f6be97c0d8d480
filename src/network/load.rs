use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::parse::parse_network_payload;
use super::record::NetworkPayload;

/// Reads a saved "artist-network" response from disk.
///
/// `artist_override` wins over any artist name embedded in the payload.
pub fn load_network(path: &Path, artist_override: Option<&str>) -> Result<NetworkPayload> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read network data from {}", path.display()))?;

    let mut payload = parse_network_payload(&raw)
        .with_context(|| format!("failed to parse network data in {}", path.display()))?;

    if let Some(artist) = artist_override.map(str::trim).filter(|name| !name.is_empty()) {
        payload.artist = Some(artist.to_owned());
    }

    tracing::info!(
        path = %path.display(),
        artist = payload.artist.as_deref().unwrap_or("<none>"),
        connections = payload.connections.len(),
        "loaded network data"
    );

    Ok(payload)
}
