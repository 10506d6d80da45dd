use lastra_geometry::GeometryError;
use lastra_image::ImageError;
use lastra_imgproc::ImgprocError;
use lastra_io::IoError;
use serde::{Deserialize, Serialize};

use crate::event::JobState;

/// Errors raised while loading or querying the scene catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The definition is not valid JSON or does not match the schema.
    #[error("Failed to parse the scene catalog. {0}")]
    Parse(String),

    /// The definition declares a version this build does not understand.
    #[error("Unsupported scene catalog version {0}")]
    UnsupportedVersion(u32),

    /// A scene has an empty identifier.
    #[error("Scene identifiers must not be empty")]
    EmptySceneId,

    /// Two scenes share an identifier.
    #[error("Scene `{0}` is defined more than once")]
    DuplicateScene(String),

    /// A scene lists no recipes.
    #[error("Scene `{0}` has no variant recipes")]
    NoRecipes(String),

    /// A recipe lists no panels.
    #[error("Recipe `{label}` of scene `{scene}` has no panels")]
    NoPanels {
        /// scene identifier
        scene: String,
        /// recipe label
        label: String,
    },

    /// A recipe canvas has a zero side.
    #[error("Recipe `{label}` of scene `{scene}` has an empty canvas")]
    EmptyCanvas {
        /// scene identifier
        scene: String,
        /// recipe label
        label: String,
    },

    /// A recipe canvas is too large to allocate.
    #[error("Recipe `{label}` of scene `{scene}` has a canvas too large to allocate")]
    CanvasTooLarge {
        /// scene identifier
        scene: String,
        /// recipe label
        label: String,
    },

    /// A separator is not finite, lies far outside the canvas or is wider than it.
    #[error("Separator {index} of recipe `{label}` of scene `{scene}` does not fit its canvas")]
    InvalidSeparator {
        /// scene identifier
        scene: String,
        /// recipe label
        label: String,
        /// position in the recipe's separator list
        index: usize,
    },

    /// A panel source region is not a sub-rectangle of the unit square.
    #[error("Recipe `{label}` of scene `{scene}` has a source region outside [0, 1]")]
    InvalidSourceRegion {
        /// scene identifier
        scene: String,
        /// recipe label
        label: String,
    },

    /// No scene with this identifier exists.
    #[error("Unknown scene `{0}`")]
    UnknownScene(String),
}

/// Errors raised while resolving background and overlay templates.
#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    /// The template store has no entry for the identifier.
    #[error("Template `{0}` is not available")]
    Missing(String),

    /// The template bytes could not be decoded.
    #[error("Template `{id}` could not be decoded. {source}")]
    Decode {
        /// template identifier
        id: String,
        /// decoder error
        #[source]
        source: IoError,
    },

    /// The template has no pixels and cannot be fitted to a canvas.
    #[error("Template `{0}` is empty")]
    Empty(String),
}

/// Terminal failure kinds reported in `Failed` events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unsolvable or non-invertible homography.
    DegenerateGeometry,
    /// Crop rectangle or source region out of bounds or empty.
    InvalidRegion,
    /// Bad scene identifier.
    UnknownScene,
    /// Unreadable source image, template or scene data.
    DecodeFailure,
    /// The finished variant could not be encoded.
    EncodeFailure,
    /// Cooperative cancellation was honoured.
    Cancelled,
}

impl ErrorKind {
    /// Stable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DegenerateGeometry => "DegenerateGeometry",
            ErrorKind::InvalidRegion => "InvalidRegion",
            ErrorKind::UnknownScene => "UnknownScene",
            ErrorKind::DecodeFailure => "DecodeFailure",
            ErrorKind::EncodeFailure => "EncodeFailure",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure of a render job.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Catalog lookup or scene data problem.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Template resolution problem.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The source image could not be decoded.
    #[error(transparent)]
    Decode(#[from] IoError),

    /// The finished variant could not be encoded.
    #[error("Failed to encode variant `{label}`. {source}")]
    Encode {
        /// recipe label
        label: String,
        /// encoder error
        #[source]
        source: IoError,
    },

    /// A raster operation failed.
    #[error(transparent)]
    Raster(#[from] ImgprocError),

    /// A recipe quadrilateral is degenerate.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// An image buffer could not be created or a region is invalid.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The job was cancelled by the caller.
    #[error("Render job cancelled")]
    Cancelled,

    /// A job step ran without the data of the steps before it.
    #[error("Render job reached {0:?} without its inputs")]
    OutOfOrder(JobState),
}

impl RenderError {
    /// Collapse the error into the kind reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Catalog(CatalogError::UnknownScene(_)) => ErrorKind::UnknownScene,
            RenderError::Catalog(_) => ErrorKind::DecodeFailure,
            RenderError::Template(_) => ErrorKind::DecodeFailure,
            RenderError::Decode(_) => ErrorKind::DecodeFailure,
            RenderError::Encode { .. } => ErrorKind::EncodeFailure,
            RenderError::Raster(ImgprocError::Geometry(_)) => ErrorKind::DegenerateGeometry,
            RenderError::Raster(e) if e.is_invalid_region() => ErrorKind::InvalidRegion,
            RenderError::Raster(_) => ErrorKind::DecodeFailure,
            RenderError::Geometry(_) => ErrorKind::DegenerateGeometry,
            RenderError::Image(ImageError::InvalidRegion { .. }) => ErrorKind::InvalidRegion,
            RenderError::Image(_) => ErrorKind::DecodeFailure,
            RenderError::Cancelled => ErrorKind::Cancelled,
            RenderError::OutOfOrder(_) => ErrorKind::DecodeFailure,
        }
    }
}
