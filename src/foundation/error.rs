/// Convenience result type used across gifscrub.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Top-level error taxonomy. Every variant is fatal to the current playback session.
#[derive(thiserror::Error, Debug)]
pub enum ScrubError {
    /// Fetching the raw bytes failed, or the fetched content is unusable.
    #[error("transport error: {0}")]
    Transport(String),

    /// The bytes do not start with `GIF87a` or `GIF89a`.
    #[error(
        "signature error: response is not GIF data (missing GIF87a/GIF89a header). First bytes: {preview}"
    )]
    Signature {
        /// Hex preview of the leading bytes.
        preview: String,
    },

    /// The decoder produced zero logical frames.
    #[error("empty animation: no GIF frames were decoded")]
    EmptyAnimation,

    /// A logical frame could not be composited.
    #[error("composition error: frame {frame}: {detail}")]
    Composition {
        /// Index of the offending logical frame.
        frame: usize,
        /// Dimensions, offsets and the underlying failure.
        detail: String,
    },

    /// The render surface could not be acquired or written.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The external decoder rejected the byte stream.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A failure annotated with the session stage it happened in.
    #[error("failed during {stage}{}: {source}", target_suffix(.target))]
    Stage {
        /// Stage label, e.g. `decoding gif`.
        stage: &'static str,
        /// Identifier of the animation being loaded, if known.
        target: Option<String>,
        /// The underlying failure.
        #[source]
        source: Box<ScrubError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn target_suffix(target: &Option<String>) -> String {
    match target {
        Some(t) if !t.is_empty() => format!(" for {t}"),
        _ => String::new(),
    }
}

impl ScrubError {
    /// Build a [`ScrubError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`ScrubError::Signature`] value.
    pub fn signature(preview: impl Into<String>) -> Self {
        Self::Signature {
            preview: preview.into(),
        }
    }

    /// Build a [`ScrubError::Composition`] value.
    pub fn composition(frame: usize, detail: impl Into<String>) -> Self {
        Self::Composition {
            frame,
            detail: detail.into(),
        }
    }

    /// Build a [`ScrubError::SurfaceUnavailable`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`ScrubError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ScrubError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrubError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap `self` with the stage (and optional target) it occurred in.
    pub fn at_stage(self, stage: &'static str, target: Option<&str>) -> Self {
        Self::Stage {
            stage,
            target: target.map(str::to_owned),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through [`ScrubError::Stage`] wrappers.
    pub fn root(&self) -> &ScrubError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
