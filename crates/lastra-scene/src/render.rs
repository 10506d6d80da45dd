use std::{borrow::Cow, sync::Arc};

use lastra_image::{Image, Rect, Rgba8Image};
use lastra_imgproc::{
    composite::{alpha_over, draw_over},
    crop::crop_image,
    draw::draw_line,
    flip,
    resize::{fit_longest_side, resize},
    warp::warp_into_quad,
    ImgprocError,
};
use lastra_io::{decode_rgba8, encode, OutputEncoding};

use crate::{
    cancel::CancelToken,
    catalog::SceneCatalog,
    error::{RenderError, TemplateError},
    event::{JobState, RenderEvent},
    options::RenderOptions,
    recipe::{Scene, SourceRegion, VariantRecipe},
    template::TemplateSource,
};

/// What the caller wants rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Encoded source photo (PNG, JPEG or WebP).
    pub source: Vec<u8>,
    /// Rectangle of the decoded source to keep, the whole image when absent.
    pub crop: Option<Rect>,
    /// Scene to render.
    pub scene_id: String,
}

impl RenderRequest {
    /// A request for the whole source.
    pub fn new(source: Vec<u8>, scene_id: impl Into<String>) -> Self {
        Self {
            source,
            crop: None,
            scene_id: scene_id.into(),
        }
    }

    /// Restrict the source to `crop` before rendering.
    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop = Some(crop);
        self
    }
}

/// Renders every variant of a scene from one source photo.
///
/// A renderer is cheap to clone and holds only read-only state, so one
/// instance can serve any number of concurrent jobs.
#[derive(Clone)]
pub struct Renderer {
    catalog: Arc<SceneCatalog>,
    templates: Arc<dyn TemplateSource>,
    options: RenderOptions,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("scenes", &self.catalog.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Create a renderer.
    ///
    /// # Errors
    ///
    /// [`RenderError::Raster`] when `options.strategy` cannot be executed.
    pub fn new(
        catalog: Arc<SceneCatalog>,
        templates: Arc<dyn TemplateSource>,
        options: RenderOptions,
    ) -> Result<Self, RenderError> {
        options.strategy.validate().map_err(ImgprocError::from)?;
        Ok(Self {
            catalog,
            templates,
            options,
        })
    }

    /// Create a renderer over the scenes shipped with the crate.
    pub fn with_builtin_catalog(
        templates: Arc<dyn TemplateSource>,
        options: RenderOptions,
    ) -> Result<Self, RenderError> {
        let catalog = SceneCatalog::builtin()?.clone();
        Self::new(Arc::new(catalog), templates, options)
    }

    /// The catalog scenes are looked up in.
    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// The options every job runs with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Start a job; nothing happens until the returned iterator is polled.
    pub fn render(
        &self,
        request: RenderRequest,
        encoding: OutputEncoding,
        cancel: CancelToken,
    ) -> RenderJob {
        RenderJob {
            renderer: self.clone(),
            request,
            encoding,
            cancel,
            state: JobState::Idle,
            scene: None,
            source: None,
            finished: None,
            emitted: 0,
        }
    }

    /// Composite a single variant from an already decoded and cropped source.
    ///
    /// # Errors
    ///
    /// Any template, region, geometry or raster failure of the recipe.
    pub fn render_variant(
        &self,
        source: &Rgba8Image,
        recipe: &VariantRecipe,
    ) -> Result<Rgba8Image, RenderError> {
        let opts = &self.options;
        let mut canvas = Image::from_size_pixel(recipe.canvas, recipe.fill)?;

        if let Some(id) = &recipe.background {
            let background = self.fitted_template(id, &canvas)?;
            alpha_over(&mut canvas, &background, opts.strategy)?;
        }

        let mut source = Cow::Borrowed(source);
        if recipe.rotate_source {
            source = Cow::Owned(flip::rotate_180(&*source));
        }
        if recipe.mirror_source {
            source = Cow::Owned(flip::horizontal_flip(&*source));
        }

        for (i, panel) in recipe.panels.iter().enumerate() {
            let region = match panel.region {
                Some(region) if region != SourceRegion::FULL => {
                    let rect = region.resolve(source.size())?;
                    Cow::Owned(crop_image(&*source, &rect)?)
                }
                _ => Cow::Borrowed(&*source),
            };
            let oriented = panel.orientation.apply(&region)?;
            log::debug!(
                "panel {i} of `{}`: {}x{} source, {:?}",
                recipe.label,
                oriented.width(),
                oriented.height(),
                panel.orientation
            );

            let layer = warp_into_quad(
                &*oriented,
                recipe.canvas,
                &panel.quad,
                opts.interpolation,
                opts.strategy,
            )?;
            alpha_over(&mut canvas, &layer, opts.strategy)?;
        }

        if let Some(id) = &recipe.overlay {
            let overlay = self.fitted_template(id, &canvas)?;
            alpha_over(&mut canvas, &overlay, opts.strategy)?;
        }

        for sep in &recipe.separators {
            let p0 = (sep.from.x.round() as i64, sep.from.y.round() as i64);
            let p1 = (sep.to.x.round() as i64, sep.to.y.round() as i64);
            draw_line(&mut canvas, p0, p1, sep.color, sep.thickness);
        }

        self.post_process(canvas)
    }

    /// Resolve a template and stretch it to the canvas size.
    fn fitted_template(
        &self,
        id: &str,
        canvas: &Rgba8Image,
    ) -> Result<Arc<Rgba8Image>, RenderError> {
        let template = self.templates.resolve(id)?;
        if template.size().area() == 0 {
            return Err(TemplateError::Empty(id.to_string()).into());
        }
        if template.size() == canvas.size() {
            return Ok(template);
        }
        log::debug!(
            "fitting template `{id}` from {} to {}",
            template.size(),
            canvas.size()
        );
        let fitted = resize(
            &*template,
            canvas.size(),
            self.options.interpolation,
            self.options.strategy,
        )?;
        Ok(Arc::new(fitted))
    }

    /// Output flip, downscale and watermark, in that order.
    fn post_process(&self, mut image: Rgba8Image) -> Result<Rgba8Image, RenderError> {
        let opts = &self.options;

        if opts.flip_output {
            image = flip::horizontal_flip(&image);
        }

        if let Some(max) = opts.max_output_dimension {
            let target = fit_longest_side(image.size(), max);
            if target != image.size() {
                image = resize(&image, target, opts.interpolation, opts.strategy)?;
            }
        }

        if let Some(mark) = &opts.watermark {
            let template = self.templates.resolve(&mark.template)?;
            let x = image.width() as i64 - template.width() as i64 - mark.margin_right as i64;
            let y = image.height() as i64 - template.height() as i64 - mark.margin_bottom as i64;
            draw_over(&mut image, &template, (x, y));
        }

        Ok(image)
    }
}

/// A lazily evaluated render job.
///
/// Every call to [`Iterator::next`] advances the job by one step and yields the
/// next event: `Started`, one `VariantReady` per recipe in catalog order, then
/// `Completed`. A failure yields a single `Failed` event and ends the stream;
/// variants emitted before it stay valid. Cancellation ends the stream without
/// a further event.
pub struct RenderJob {
    renderer: Renderer,
    request: RenderRequest,
    encoding: OutputEncoding,
    cancel: CancelToken,
    state: JobState,
    scene: Option<Scene>,
    source: Option<Rgba8Image>,
    finished: Option<Rgba8Image>,
    emitted: usize,
}

impl std::fmt::Debug for RenderJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderJob")
            .field("scene_id", &self.request.scene_id)
            .field("state", &self.state)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl RenderJob {
    /// Current position in the state machine.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Number of `VariantReady` events emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn total(&self) -> usize {
        self.scene.as_ref().map_or(0, |s| s.recipes.len())
    }

    fn check_cancelled(&self) -> Result<(), RenderError> {
        if self.cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }

    /// Advance by one transition, returning the event it produced, if any.
    fn step(&mut self) -> Result<Option<RenderEvent>, RenderError> {
        match self.state {
            JobState::Idle => {
                let scene = self.renderer.catalog.get(&self.request.scene_id)?.clone();
                let total = scene.recipes.len();
                log::info!("rendering scene `{}` ({total} variants)", scene.id);
                let event = RenderEvent::Started {
                    scene_id: scene.id.clone(),
                    total,
                };
                self.scene = Some(scene);
                self.state = JobState::Loading;
                Ok(Some(event))
            }
            JobState::Loading => {
                self.check_cancelled()?;
                let bytes = std::mem::take(&mut self.request.source);
                let mut source = decode_rgba8(&bytes)?;
                if let Some(rect) = &self.request.crop {
                    source = crop_image(&source, rect)?;
                }
                log::debug!("source ready: {}", source.size());
                self.source = Some(source);
                self.state = JobState::Rendering(0);
                Ok(None)
            }
            JobState::Rendering(i) => {
                self.check_cancelled()?;
                let total = self.total();
                if i >= total {
                    log::info!(
                        "scene `{}` completed, {} of {total} variants",
                        self.request.scene_id,
                        self.emitted
                    );
                    self.state = JobState::Done;
                    self.source = None;
                    return Ok(Some(RenderEvent::Completed {
                        count: self.emitted,
                        total,
                    }));
                }

                let (Some(scene), Some(source)) = (&self.scene, &self.source) else {
                    return Err(RenderError::OutOfOrder(self.state));
                };
                let recipe = &scene.recipes[i];
                log::debug!("rendering variant {i} `{}`", recipe.label);
                let image = self.renderer.render_variant(source, recipe)?;
                self.finished = Some(image);
                self.state = JobState::Emitting(i);
                Ok(None)
            }
            JobState::Emitting(i) => {
                let total = self.total();
                let (Some(scene), Some(image)) = (&self.scene, self.finished.take()) else {
                    return Err(RenderError::OutOfOrder(self.state));
                };
                let label = scene.recipes[i].label.clone();
                let bytes = encode(&image, self.encoding).map_err(|source| RenderError::Encode {
                    label: label.clone(),
                    source,
                })?;
                self.emitted += 1;
                self.state = JobState::Rendering(i + 1);
                Ok(Some(RenderEvent::VariantReady {
                    index: i,
                    total,
                    label,
                    size: image.size(),
                    mime_type: self.encoding.mime_type(),
                    image: bytes,
                }))
            }
            JobState::Done | JobState::Failed(_) => Ok(None),
        }
    }

    /// Move to `Failed` and produce the terminal event.
    fn fail(&mut self, err: RenderError) -> Option<RenderEvent> {
        let kind = err.kind();
        self.state = JobState::Failed(kind);
        self.source = None;
        self.finished = None;

        if let RenderError::Cancelled = err {
            log::warn!(
                "scene `{}` cancelled after {} variants",
                self.request.scene_id,
                self.emitted
            );
            return None;
        }

        log::warn!("scene `{}` failed: {err}", self.request.scene_id);
        Some(RenderEvent::Failed {
            kind,
            message: err.to_string(),
        })
    }
}

impl Iterator for RenderJob {
    type Item = RenderEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state.is_terminal() {
                return None;
            }
            match self.step() {
                Ok(Some(event)) => return Some(event),
                Ok(None) => continue,
                Err(err) => return self.fail(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lastra_geometry::Quad;
    use lastra_image::{Image, ImageSize, Rgba8Image};
    use lastra_io::{encode, OutputEncoding};

    use super::{RenderRequest, Renderer};
    use crate::{
        recipe::{Orientation, PanelRecipe, Scene, VariantRecipe},
        CancelToken, ErrorKind, JobState, RenderEvent, RenderOptions, SceneCatalog,
        TemplateStore, Watermark,
    };

    fn stripes(size: ImageSize) -> Result<Rgba8Image, Box<dyn std::error::Error>> {
        let mut data = Vec::with_capacity(size.area() * 4);
        for _y in 0..size.height {
            for x in 0..size.width {
                let v = if x < size.width / 2 { 40 } else { 200 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Ok(Image::new(size, data)?)
    }

    fn full_canvas_scene(canvas: ImageSize) -> Scene {
        let quad = Quad::from_rect(0.0, 0.0, canvas.width as f64, canvas.height as f64);
        Scene {
            id: "flat".into(),
            name: String::new(),
            recipes: vec![VariantRecipe {
                label: "flat".into(),
                canvas,
                fill: [0, 0, 0, 0],
                background: None,
                overlay: None,
                mirror_source: false,
                rotate_source: false,
                panels: vec![PanelRecipe {
                    quad,
                    region: None,
                    orientation: Orientation::Original,
                }],
                separators: vec![],
            }],
        }
    }

    fn renderer(
        scene: Scene,
        store: TemplateStore,
        options: RenderOptions,
    ) -> Result<Renderer, Box<dyn std::error::Error>> {
        let catalog = SceneCatalog::from_scenes(vec![scene])?;
        Ok(Renderer::new(Arc::new(catalog), Arc::new(store), options)?)
    }

    #[test]
    fn render_variant_identity() -> Result<(), Box<dyn std::error::Error>> {
        let size = ImageSize {
            width: 16,
            height: 8,
        };
        let src = stripes(size)?;
        let r = renderer(full_canvas_scene(size), TemplateStore::new(), Default::default())?;
        let out = r.render_variant(&src, &r.catalog().get("flat")?.recipes[0])?;
        assert_eq!(out, src);
        Ok(())
    }

    #[test]
    fn flip_and_downscale() -> Result<(), Box<dyn std::error::Error>> {
        let size = ImageSize {
            width: 16,
            height: 8,
        };
        let src = stripes(size)?;
        let options = RenderOptions::default()
            .with_flip_output(true)
            .with_max_output_dimension(8);
        let r = renderer(full_canvas_scene(size), TemplateStore::new(), options)?;
        let out = r.render_variant(&src, &r.catalog().get("flat")?.recipes[0])?;
        assert_eq!(out.size(), ImageSize { width: 8, height: 4 });
        assert_eq!(out.pixel(0, 0)?, &[200, 200, 200, 255]);
        assert_eq!(out.pixel(7, 3)?, &[40, 40, 40, 255]);
        Ok(())
    }

    #[test]
    fn watermark_bottom_right() -> Result<(), Box<dyn std::error::Error>> {
        let size = ImageSize {
            width: 16,
            height: 8,
        };
        let src = Image::from_size_pixel(size, [0, 0, 0, 255])?;
        let mark = Image::from_size_pixel([2, 2].into(), [255, 0, 0, 255])?;
        let store = TemplateStore::new().with("mark", mark);
        let options = RenderOptions::default().with_watermark(Watermark {
            template: "mark".into(),
            margin_right: 1,
            margin_bottom: 1,
        });
        let r = renderer(full_canvas_scene(size), store, options)?;
        let out = r.render_variant(&src, &r.catalog().get("flat")?.recipes[0])?;
        assert_eq!(out.pixel(13, 5)?, &[255, 0, 0, 255]);
        assert_eq!(out.pixel(14, 6)?, &[255, 0, 0, 255]);
        assert_eq!(out.pixel(15, 7)?, &[0, 0, 0, 255]);
        assert_eq!(out.pixel(12, 5)?, &[0, 0, 0, 255]);
        Ok(())
    }

    #[test]
    fn job_states() -> Result<(), Box<dyn std::error::Error>> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let png = encode(&stripes(size)?, OutputEncoding::Png)?;
        let r = renderer(full_canvas_scene(size), TemplateStore::new(), Default::default())?;
        let mut job = r.render(
            RenderRequest::new(png, "flat"),
            OutputEncoding::Raw,
            CancelToken::new(),
        );
        assert_eq!(job.state(), JobState::Idle);
        assert!(matches!(job.next(), Some(RenderEvent::Started { total: 1, .. })));
        assert_eq!(job.state(), JobState::Loading);
        assert!(matches!(job.next(), Some(RenderEvent::VariantReady { index: 0, .. })));
        assert_eq!(job.state(), JobState::Rendering(1));
        assert!(matches!(
            job.next(),
            Some(RenderEvent::Completed { count: 1, total: 1 })
        ));
        assert_eq!(job.state(), JobState::Done);
        assert_eq!(job.next(), None);
        Ok(())
    }

    #[test]
    fn cancelled_before_loading() -> Result<(), Box<dyn std::error::Error>> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let png = encode(&stripes(size)?, OutputEncoding::Png)?;
        let r = renderer(full_canvas_scene(size), TemplateStore::new(), Default::default())?;
        let cancel = CancelToken::new();
        let mut job = r.render(RenderRequest::new(png, "flat"), OutputEncoding::Raw, cancel.clone());
        assert!(matches!(job.next(), Some(RenderEvent::Started { .. })));
        cancel.cancel();
        assert_eq!(job.next(), None);
        assert_eq!(job.state(), JobState::Failed(ErrorKind::Cancelled));
        assert_eq!(job.next(), None);
        Ok(())
    }

    #[test]
    fn invalid_strategy() {
        let options = RenderOptions::default()
            .with_strategy(lastra_imgproc::parallel::ExecutionStrategy::Fixed(0));
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        assert!(renderer(full_canvas_scene(size), TemplateStore::new(), options).is_err());
    }
}
