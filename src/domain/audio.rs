use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Identifier attached to every audio asset flowing through the pipeline,
/// carried in error reports so a failed job can name the exact input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable reference to an audio recording on disk plus its derived
/// metadata. Never mutated after creation; segments derived from it are new
/// `AudioAsset` values owned by the splitting step.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAsset {
    pub id: AssetId,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl AudioAsset {
    pub fn new(path: impl AsRef<Path>, size_bytes: u64) -> Self {
        Self {
            id: AssetId::new(),
            path: path.as_ref().to_path_buf(),
            size_bytes,
        }
    }

    pub fn fits_within(&self, ceiling_bytes: u64) -> bool {
        self.size_bytes <= ceiling_bytes
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// A time-bounded slice of an original asset. The ordinal position is
/// significant: segment transcripts are reassembled in `index` order.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    pub index: usize,
    pub asset: AudioAsset,
}

/// Outcome of bringing an oversized asset under the size ceiling.
#[derive(Debug, Clone, PartialEq)]
pub enum ReducedAudio {
    /// A single asset at or under the ceiling. Assets that already fit are
    /// returned here unchanged.
    Compressed(AudioAsset),
    /// Ordered, contiguous time segments, each at or under the ceiling.
    Split(Vec<AudioSegment>),
}
