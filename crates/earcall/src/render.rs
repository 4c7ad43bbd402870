use std::path::PathBuf;

use chord_score::{events_to_midi, ChordEvent, ScoreParams};
use chord_theory::CanonicalKey;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Reference to a rendered audio asset, owned by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(pub String);

/// Boundary to the audio-rendering collaborator.
///
/// The collaborator owns turning the symbolic event sequence into a playable
/// asset, plus any on-disk caching and naming. The engine only requires that
/// the same canonical key always maps to the same audio content.
pub trait ChordRenderer {
    fn render(&self, key: &CanonicalKey, events: &[ChordEvent]) -> Result<AudioRef, RenderError>;
}

/// Renders a chord by writing `<dir>/<canonical-key>.mid`.
///
/// The file name is a pure function of the canonical key; identical keys
/// always produce identical bytes at identical paths.
#[derive(Debug, Clone)]
pub struct SmfDirRenderer {
    dir: PathBuf,
    params: ScoreParams,
}

impl SmfDirRenderer {
    pub fn new(dir: impl Into<PathBuf>, params: ScoreParams) -> Self {
        Self {
            dir: dir.into(),
            params,
        }
    }

    pub fn path_for(&self, key: &CanonicalKey) -> PathBuf {
        self.dir.join(format!("{key}.mid"))
    }
}

impl ChordRenderer for SmfDirRenderer {
    fn render(&self, key: &CanonicalKey, events: &[ChordEvent]) -> Result<AudioRef, RenderError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| RenderError::Io {
            key: key.to_string(),
            source,
        })?;
        let path = self.path_for(key);
        let bytes = events_to_midi(events, &self.params);
        std::fs::write(&path, &bytes).map_err(|source| RenderError::Io {
            key: key.to_string(),
            source,
        })?;

        tracing::debug!(key = %key, path = %path.display(), "score written");
        Ok(AudioRef(path.to_string_lossy().into_owned()))
    }
}
