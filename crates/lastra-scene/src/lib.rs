#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Cooperative cancellation.
pub mod cancel;

/// Streaming adapter running a job on a worker thread.
pub mod channel;

/// The versioned scene catalog.
pub mod catalog;

/// Error types for the scene module.
pub mod error;

/// Events and job states.
pub mod event;

/// Renderer configuration.
pub mod options;

/// Declarative scene and variant recipes.
pub mod recipe;

/// The variant orchestrator.
pub mod render;

/// Template resolution.
pub mod template;

pub use crate::cancel::CancelToken;
pub use crate::catalog::SceneCatalog;
pub use crate::channel::spawn_render;
pub use crate::error::{CatalogError, ErrorKind, RenderError, TemplateError};
pub use crate::event::{JobState, RenderEvent};
pub use crate::options::{RenderOptions, Watermark};
pub use crate::recipe::{
    Orientation, PanelRecipe, Scene, Separator, SourceRegion, TemplateId, VariantRecipe,
};
pub use crate::render::{RenderJob, RenderRequest, Renderer};
pub use crate::template::{EncodedTemplateStore, TemplateSource, TemplateStore};
