use lastra_image::ImageSize;
use serde::Serialize;

use crate::error::ErrorKind;

/// Progress of a render job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Created, nothing done yet.
    Idle,
    /// Decoding and cropping the source.
    Loading,
    /// Compositing variant `i`.
    Rendering(usize),
    /// Encoding and emitting variant `i`.
    Emitting(usize),
    /// Every variant was emitted.
    Done,
    /// Stopped on a failure or cancellation.
    Failed(ErrorKind),
}

impl JobState {
    /// Whether the job will not produce further events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed(_))
    }
}

/// One element of the ordered event stream of a render job.
///
/// Serializes with an `event` tag so transports can forward it as JSON; encoded
/// image bytes are left out of the serialized form.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    /// The scene resolved and `total` variants will be attempted.
    Started {
        /// scene identifier
        scene_id: String,
        /// number of variants in the scene
        total: usize,
    },
    /// Variant `index` is finished.
    VariantReady {
        /// zero based position in the scene
        index: usize,
        /// number of variants in the scene
        total: usize,
        /// recipe label
        label: String,
        /// pixel size of the encoded image
        size: ImageSize,
        /// media type of `image`
        mime_type: &'static str,
        /// encoded image
        #[serde(skip)]
        image: Vec<u8>,
    },
    /// Every variant was emitted.
    Completed {
        /// number of variants emitted
        count: usize,
        /// number of variants in the scene
        total: usize,
    },
    /// The job stopped; variants already emitted stay valid.
    Failed {
        /// failure kind
        kind: ErrorKind,
        /// human readable description
        message: String,
    },
}

impl RenderEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderEvent::Completed { .. } | RenderEvent::Failed { .. })
    }
}
