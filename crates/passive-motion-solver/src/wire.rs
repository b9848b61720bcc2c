//! The published tile wire format.
//!
//! A solution is a flat sequence of 20-byte records with no header or count;
//! consumers derive the tile count from `payload.len() / 20`. Each record is
//! five big-endian `f32`s: the tile's two corners followed by its score.

use passive_motion_core::ScoredTile;

use crate::error::{SolverError, SolverResult};

/// Bytes per encoded tile record.
pub const RECORD_SIZE: usize = 20;

/// One decoded tile record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRecord {
    /// Left edge of the tile
    pub x1: f32,
    /// Bottom edge of the tile
    pub y1: f32,
    /// Right edge of the tile
    pub x2: f32,
    /// Top edge of the tile
    pub y2: f32,
    /// The tile's motion score
    pub score: f32,
}

impl From<&ScoredTile> for TileRecord {
    fn from(tile: &ScoredTile) -> Self {
        Self {
            x1: tile.rect.x,
            y1: tile.rect.y,
            x2: tile.rect.x + tile.rect.width,
            y2: tile.rect.y + tile.rect.height,
            score: tile.score,
        }
    }
}

/// Encodes solution tiles into a wire payload.
#[must_use]
pub fn encode(tiles: &[ScoredTile]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(tiles.len() * RECORD_SIZE);
    for tile in tiles {
        let record = TileRecord::from(tile);
        for value in [record.x1, record.y1, record.x2, record.y2, record.score] {
            payload.extend_from_slice(&value.to_be_bytes());
        }
    }
    payload
}

/// Decodes a wire payload back into tile records.
pub fn decode(payload: &[u8]) -> SolverResult<Vec<TileRecord>> {
    if payload.len() % RECORD_SIZE != 0 {
        return Err(SolverError::MalformedPayload {
            length: payload.len(),
        });
    }
    Ok(payload
        .chunks_exact(RECORD_SIZE)
        .map(|chunk| TileRecord {
            x1: read_f32(&chunk[0..4]),
            y1: read_f32(&chunk[4..8]),
            x2: read_f32(&chunk[8..12]),
            y2: read_f32(&chunk[12..16]),
            score: read_f32(&chunk[16..20]),
        })
        .collect())
}

fn read_f32(bytes: &[u8]) -> f32 {
    f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
