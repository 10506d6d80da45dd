use lastra_imgproc::{interpolation::InterpolationMode, parallel::ExecutionStrategy};

use crate::recipe::TemplateId;

/// A mark drawn in the bottom-right corner of every finished variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Watermark {
    /// template holding the mark
    pub template: TemplateId,
    /// gap to the right border in pixels
    pub margin_right: usize,
    /// gap to the bottom border in pixels
    pub margin_bottom: usize,
}

impl Watermark {
    /// A watermark with the default 5 pixel margins.
    pub fn new(template: impl Into<TemplateId>) -> Self {
        Self {
            template: template.into(),
            margin_right: 5,
            margin_bottom: 5,
        }
    }
}

/// Tuning knobs of a [`crate::Renderer`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOptions {
    /// Resampling used by warps and template fitting.
    pub interpolation: InterpolationMode,
    /// Row parallelism inside a single variant.
    pub strategy: ExecutionStrategy,
    /// Mirror every finished variant.
    pub flip_output: bool,
    /// Downscale variants whose longest side exceeds this many pixels.
    pub max_output_dimension: Option<usize>,
    /// Mark drawn onto every variant.
    pub watermark: Option<Watermark>,
}

impl RenderOptions {
    /// Set the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Mirror every finished variant.
    pub fn with_flip_output(mut self, flip: bool) -> Self {
        self.flip_output = flip;
        self
    }

    /// Cap the longest side of the finished variants.
    pub fn with_max_output_dimension(mut self, max: usize) -> Self {
        self.max_output_dimension = Some(max);
        self
    }

    /// Draw a watermark onto every variant.
    pub fn with_watermark(mut self, watermark: Watermark) -> Self {
        self.watermark = Some(watermark);
        self
    }
}
