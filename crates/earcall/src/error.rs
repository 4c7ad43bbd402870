use thiserror::Error;

/// Request-time quiz failures. None of these touch catalog integrity.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The requested tier filters the catalog down to nothing. Surfaced to
    /// the caller as "no content available", never a fallback to another
    /// tier.
    #[error("difficulty tier {tier:?} selects no chords")]
    EmptyPool { tier: String },

    /// A tier override named a quality the catalog does not define.
    #[error("unknown quality name {name:?} in tier override")]
    UnknownQuality { name: String },

    /// The round does not exist or was already graded.
    #[error("unknown or already-graded round {round_id:?}")]
    UnknownRound { round_id: String },

    /// The rendering collaborator failed; the challenge was withdrawn.
    #[error("challenge unavailable: {source}")]
    ChallengeUnavailable {
        #[from]
        source: RenderError,
    },
}

/// Failure reported by the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write score for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
