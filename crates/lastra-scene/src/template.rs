use std::{collections::HashMap, sync::Arc};

use lastra_image::Rgba8Image;

use crate::error::TemplateError;

/// Resolves opaque template identifiers to decoded RGBA8 buffers.
///
/// Implemented by the caller's storage layer; the engine never touches files.
pub trait TemplateSource: Send + Sync {
    /// Fetch the template registered under `id`.
    fn resolve(&self, id: &str) -> Result<Arc<Rgba8Image>, TemplateError>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for Arc<T> {
    fn resolve(&self, id: &str) -> Result<Arc<Rgba8Image>, TemplateError> {
        (**self).resolve(id)
    }
}

/// In-memory store of decoded templates.
#[derive(Clone, Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Arc<Rgba8Image>>,
}

impl TemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, returning the one it replaces.
    pub fn insert(&mut self, id: impl Into<String>, image: Rgba8Image) -> Option<Arc<Rgba8Image>> {
        self.templates.insert(id.into(), Arc::new(image))
    }

    /// Builder flavour of [`TemplateStore::insert`].
    pub fn with(mut self, id: impl Into<String>, image: Rgba8Image) -> Self {
        self.insert(id, image);
        self
    }

    /// Whether a template is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for TemplateStore {
    fn resolve(&self, id: &str) -> Result<Arc<Rgba8Image>, TemplateError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::Missing(id.to_string()))
    }
}

/// Store of encoded template files (PNG, JPEG, WebP), decoded on every lookup.
///
/// The caller owns any caching of decoded buffers.
#[derive(Clone, Debug, Default)]
pub struct EncodedTemplateStore {
    templates: HashMap<String, Arc<[u8]>>,
}

impl EncodedTemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded bytes under `id`.
    pub fn insert(&mut self, id: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.templates.insert(id.into(), bytes.into());
    }

    /// Whether bytes are registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }
}

impl TemplateSource for EncodedTemplateStore {
    fn resolve(&self, id: &str) -> Result<Arc<Rgba8Image>, TemplateError> {
        let bytes = self
            .templates
            .get(id)
            .ok_or_else(|| TemplateError::Missing(id.to_string()))?;
        let image = lastra_io::decode_rgba8(bytes).map_err(|source| TemplateError::Decode {
            id: id.to_string(),
            source,
        })?;
        Ok(Arc::new(image))
    }
}
