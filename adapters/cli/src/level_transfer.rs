use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use slide_grid_board::LevelDefinition;
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "slide";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "slide:v1";
/// Delimiter used to separate the prefix, tile count and payload.
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while encoding or decoding level transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("level string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded level.
    #[error("level string is missing the prefix")]
    MissingPrefix,
    /// The encoded level did not contain a version segment.
    #[error("level string is missing the version")]
    MissingVersion,
    /// The encoded level did not include the tile count.
    #[error("level string is missing the tile count")]
    MissingTileCount,
    /// The encoded level did not include the payload segment.
    #[error("level string is missing the payload")]
    MissingPayload,
    /// The encoded level used an unexpected prefix segment.
    #[error("level prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded level used an unsupported version identifier.
    #[error("level version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The tile count could not be parsed or disagrees with the payload.
    #[error("tile count '{0}' does not match the payload")]
    InvalidTileCount(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode level payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse level payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Encodes a level into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(level: &LevelDefinition) -> Result<String, LevelTransferError> {
    let json = serde_json::to_vec(level)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{TRANSFER_HEADER}:{}:{encoded}", level.tiles.len()))
}

/// Decodes a level from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<LevelDefinition, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let tile_count = parts.next().ok_or(LevelTransferError::MissingTileCount)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let expected_tiles = tile_count
        .trim()
        .parse::<usize>()
        .map_err(|_| LevelTransferError::InvalidTileCount(tile_count.to_owned()))?;
    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let level: LevelDefinition = serde_json::from_slice(&bytes)?;

    if level.tiles.len() != expected_tiles {
        return Err(LevelTransferError::InvalidTileCount(tile_count.to_owned()));
    }

    Ok(level)
}
