use std::{
    collections::{BTreeSet, HashMap},
    sync::OnceLock,
};

use serde::{Deserialize, Serialize};

use lastra_image::ImageSize;

use crate::{
    error::CatalogError,
    recipe::{Scene, Separator},
};

/// The scene definitions shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// On-disk layout of a catalog definition.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDefinition {
    version: u32,
    scenes: Vec<Scene>,
}

/// Read-only table of scenes, looked up by identifier.
///
/// Validation at load time is structural (identifiers, non-empty recipe and
/// panel lists, canvas sizes, source regions, separator strokes).
/// Quadrilaterals are checked when a variant is rendered.
#[derive(Clone, Debug)]
pub struct SceneCatalog {
    version: u32,
    scenes: Vec<Scene>,
    index: HashMap<String, usize>,
}

impl SceneCatalog {
    /// The catalog schema version understood by this crate.
    pub const SUPPORTED_VERSION: u32 = 1;

    /// Parse and validate a JSON catalog definition.
    ///
    /// # Example
    ///
    /// ```
    /// use lastra_scene::SceneCatalog;
    ///
    /// let catalog = SceneCatalog::from_json(r#"{
    ///     "version": 1,
    ///     "scenes": [{
    ///         "id": "flat",
    ///         "recipes": [{
    ///             "label": "only",
    ///             "canvas": {"width": 64, "height": 32},
    ///             "panels": [{"quad": [[0, 0], [64, 0], [64, 32], [0, 32]]}]
    ///         }]
    ///     }]
    /// }"#).unwrap();
    ///
    /// assert_eq!(catalog.get("flat").unwrap().recipes.len(), 1);
    /// assert!(catalog.get("missing").is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definition: CatalogDefinition =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        if definition.version != Self::SUPPORTED_VERSION {
            return Err(CatalogError::UnsupportedVersion(definition.version));
        }
        Self::from_scenes(definition.scenes)
    }

    /// Build a catalog from already constructed scenes.
    pub fn from_scenes(scenes: Vec<Scene>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(scenes.len());
        for (i, scene) in scenes.iter().enumerate() {
            validate_scene(scene)?;
            if index.insert(scene.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateScene(scene.id.clone()));
            }
        }

        log::debug!("loaded scene catalog with {} scenes", scenes.len());
        Ok(Self {
            version: Self::SUPPORTED_VERSION,
            scenes,
            index,
        })
    }

    /// The catalog embedded in the crate, parsed once per process.
    pub fn builtin() -> Result<&'static SceneCatalog, CatalogError> {
        static BUILTIN: OnceLock<Result<SceneCatalog, CatalogError>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| SceneCatalog::from_json(BUILTIN_CATALOG))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Schema version of the loaded definition.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Look up a scene.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownScene`] when no scene has this identifier.
    pub fn get(&self, id: &str) -> Result<&Scene, CatalogError> {
        self.index
            .get(id)
            .map(|&i| &self.scenes[i])
            .ok_or_else(|| CatalogError::UnknownScene(id.to_string()))
    }

    /// Scenes in definition order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the catalog holds no scene.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Every template identifier referenced by any recipe, sorted.
    pub fn template_ids(&self) -> BTreeSet<&str> {
        self.scenes
            .iter()
            .flat_map(|s| s.recipes.iter())
            .flat_map(|r| r.template_ids())
            .collect()
    }
}

fn validate_scene(scene: &Scene) -> Result<(), CatalogError> {
    if scene.id.is_empty() {
        return Err(CatalogError::EmptySceneId);
    }
    if scene.recipes.is_empty() {
        return Err(CatalogError::NoRecipes(scene.id.clone()));
    }
    for recipe in &scene.recipes {
        let location = || (scene.id.clone(), recipe.label.clone());
        if recipe.panels.is_empty() {
            let (scene, label) = location();
            return Err(CatalogError::NoPanels { scene, label });
        }
        if recipe.canvas.area() == 0 {
            let (scene, label) = location();
            return Err(CatalogError::EmptyCanvas { scene, label });
        }
        if recipe.canvas.checked_len(4).is_none() {
            let (scene, label) = location();
            return Err(CatalogError::CanvasTooLarge { scene, label });
        }
        if recipe
            .panels
            .iter()
            .filter_map(|p| p.region.as_ref())
            .any(|r| !r.is_valid())
        {
            let (scene, label) = location();
            return Err(CatalogError::InvalidSourceRegion { scene, label });
        }
        if let Some(index) = recipe
            .separators
            .iter()
            .position(|sep| !separator_fits(sep, recipe.canvas))
        {
            let (scene, label) = location();
            return Err(CatalogError::InvalidSeparator {
                scene,
                label,
                index,
            });
        }
    }
    Ok(())
}

/// Separator endpoints must be finite and stay within one canvas of the canvas
/// on every side, the stroke no wider than the canvas.
fn separator_fits(sep: &Separator, canvas: ImageSize) -> bool {
    let (w, h) = (canvas.width as f64, canvas.height as f64);
    let near = |v: f64, side: f64| v.is_finite() && (-side..=2.0 * side).contains(&v);
    [sep.from, sep.to]
        .iter()
        .all(|p| near(p.x, w) && near(p.y, h))
        && sep.thickness <= canvas.longest_side()
}
