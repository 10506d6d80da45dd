use std::borrow::Cow;

use lastra_geometry::{Point2d, Quad};
use lastra_image::{ImageError, ImageSize, Rect, Rgba8Image};
use lastra_imgproc::flip;
use serde::{Deserialize, Serialize};

/// Opaque template identifier resolved by a [`crate::TemplateSource`].
pub type TemplateId = String;

/// Slack allowed when fractional regions add up to exactly one.
const FRACTION_EPS: f64 = 1e-9;

/// Sub-pixel slack before flooring a fractional edge.
const PIXEL_EPS: f64 = 1e-6;

/// Sub-rectangle of the source expressed as fractions of its width and height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRegion {
    /// left edge, fraction of the width
    pub x: f64,
    /// top edge, fraction of the height
    pub y: f64,
    /// width, fraction of the width
    pub width: f64,
    /// height, fraction of the height
    pub height: f64,
}

impl SourceRegion {
    /// The whole source.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Whether the region lies inside the unit square with a positive extent.
    pub fn is_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        in_unit(self.x)
            && in_unit(self.y)
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.0 + FRACTION_EPS
            && self.y + self.height <= 1.0 + FRACTION_EPS
    }

    /// Resolve to whole pixels of an image of `size`, flooring every edge.
    ///
    /// # Errors
    ///
    /// [`ImageError::InvalidRegion`] when the region is invalid or rounds down to
    /// an empty rectangle.
    pub fn resolve(&self, size: ImageSize) -> Result<Rect, ImageError> {
        let edge = |f: f64, n: usize| ((f * n as f64 + PIXEL_EPS).floor().max(0.0) as usize).min(n);

        let (x0, x1) = (edge(self.x, size.width), edge(self.x + self.width, size.width));
        let (y0, y1) = (edge(self.y, size.height), edge(self.y + self.height, size.height));
        let rect = Rect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0));

        if !self.is_valid() {
            return Err(ImageError::InvalidRegion {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                image_width: size.width,
                image_height: size.height,
            });
        }
        rect.check_within(size)?;
        Ok(rect)
    }
}

/// Reorientation applied to a panel's source before warping.
///
/// Quarter turns swap the width and height of the panel source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// As photographed.
    #[default]
    Original,
    /// Columns reversed.
    MirrorHorizontal,
    /// Rows reversed.
    MirrorVertical,
    /// Turned upside down.
    #[serde(rename = "rotate_180")]
    Rotate180,
    /// Turned a quarter counter-clockwise.
    #[serde(rename = "rotate_90")]
    Rotate90,
    /// Turned a quarter clockwise.
    #[serde(rename = "rotate_270")]
    Rotate270,
    /// Turned a quarter counter-clockwise, then columns reversed.
    #[serde(rename = "rotate_90_mirrored")]
    Rotate90Mirrored,
    /// Turned a quarter clockwise, then columns reversed.
    #[serde(rename = "rotate_270_mirrored")]
    Rotate270Mirrored,
}

impl Orientation {
    /// Apply the orientation, borrowing the input when nothing changes.
    ///
    /// # Errors
    ///
    /// Only if a rotated buffer cannot be allocated.
    pub fn apply<'a>(&self, image: &'a Rgba8Image) -> Result<Cow<'a, Rgba8Image>, ImageError> {
        let oriented = match self {
            Orientation::Original => return Ok(Cow::Borrowed(image)),
            Orientation::MirrorHorizontal => flip::horizontal_flip(image),
            Orientation::MirrorVertical => flip::vertical_flip(image),
            Orientation::Rotate180 => flip::rotate_180(image),
            Orientation::Rotate90 => flip::rotate_90(image)?,
            Orientation::Rotate270 => flip::rotate_270(image)?,
            Orientation::Rotate90Mirrored => flip::horizontal_flip(&flip::rotate_90(image)?),
            Orientation::Rotate270Mirrored => flip::horizontal_flip(&flip::rotate_270(image)?),
        };
        Ok(Cow::Owned(oriented))
    }
}

/// One warped copy of (a region of) the source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelRecipe {
    /// Destination corners in canvas pixels.
    pub quad: Quad,
    /// Part of the source to use, the whole source when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<SourceRegion>,
    /// Reorientation of the region before warping.
    #[serde(default)]
    pub orientation: Orientation,
}

fn default_thickness() -> usize {
    1
}

fn default_separator_color() -> [u8; 4] {
    [0, 0, 0, 255]
}

/// A thin solid stroke burnt in after the panels and the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Separator {
    /// start point in canvas pixels
    pub from: Point2d,
    /// end point in canvas pixels
    pub to: Point2d,
    /// stroke width in pixels
    #[serde(default = "default_thickness")]
    pub thickness: usize,
    /// straight RGBA color
    #[serde(default = "default_separator_color")]
    pub color: [u8; 4],
}

/// Declarative description of one variant of a scene.
///
/// Layers are drawn bottom-up: `fill`, `background`, every panel in order,
/// `overlay`, then the separators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantRecipe {
    /// Name reported with the finished variant.
    pub label: String,
    /// Size of the finished variant.
    pub canvas: ImageSize,
    /// Color the canvas starts with, transparent by default.
    #[serde(default)]
    pub fill: [u8; 4],
    /// Template drawn below the panels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<TemplateId>,
    /// Template drawn above the panels, usually a frame with a transparent window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<TemplateId>,
    /// Mirror the whole source before the panels are cut.
    #[serde(default)]
    pub mirror_source: bool,
    /// Rotate the whole source by 180 degrees before the panels are cut.
    #[serde(default)]
    pub rotate_source: bool,
    /// Warped copies of the source, later panels occlude earlier ones.
    pub panels: Vec<PanelRecipe>,
    /// Strokes drawn last.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub separators: Vec<Separator>,
}

impl VariantRecipe {
    /// Templates referenced by this recipe, background first.
    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.background
            .iter()
            .chain(self.overlay.iter())
            .map(String::as_str)
    }
}

/// A named, ordered list of variant recipes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Stable identifier used by callers.
    pub id: String,
    /// Human readable name.
    #[serde(default)]
    pub name: String,
    /// Variants in emission order.
    pub recipes: Vec<VariantRecipe>,
}

#[cfg(test)]
mod tests {
    use super::{Orientation, SourceRegion, VariantRecipe};
    use lastra_image::{ImageError, ImageSize, Rect, Rgba8Image};

    const SIZE: ImageSize = ImageSize {
        width: 1000,
        height: 801,
    };

    #[test]
    fn region_floors_edges() -> Result<(), ImageError> {
        let region = SourceRegion {
            x: 0.0,
            y: 0.45,
            width: 0.66,
            height: 0.05,
        };
        assert_eq!(region.resolve(SIZE)?, Rect::new(0, 360, 660, 40));
        assert_eq!(SourceRegion::FULL.resolve(SIZE)?, Rect::from_size(SIZE));
        Ok(())
    }

    #[test]
    fn region_ending_at_border() -> Result<(), ImageError> {
        let region = SourceRegion {
            x: 0.6666666667,
            y: 0.0,
            width: 0.3333333333,
            height: 1.0,
        };
        let rect = region.resolve(SIZE)?;
        assert_eq!(rect.right(), 1000);
        assert_eq!(rect.x, 666);
        Ok(())
    }

    #[test]
    fn region_invalid() {
        let outside = SourceRegion {
            x: 0.5,
            y: 0.0,
            width: 0.6,
            height: 1.0,
        };
        assert!(!outside.is_valid());
        assert!(matches!(
            outside.resolve(SIZE),
            Err(ImageError::InvalidRegion { .. })
        ));

        // a valid fraction of a tiny image may still be empty
        let thin = SourceRegion {
            x: 0.0,
            y: 0.0,
            width: 0.05,
            height: 1.0,
        };
        assert!(thin.resolve([10, 10].into()).is_err());
    }

    #[test]
    fn orientation_borrows_original() -> Result<(), ImageError> {
        let image = Rgba8Image::new([2, 1].into(), vec![1, 1, 1, 1, 2, 2, 2, 2])?;
        assert!(matches!(
            Orientation::Original.apply(&image)?,
            std::borrow::Cow::Borrowed(_)
        ));
        let mirrored = Orientation::MirrorHorizontal.apply(&image)?;
        assert_eq!(mirrored.as_slice(), &[2, 2, 2, 2, 1, 1, 1, 1]);
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn orientation_quarter_turns() -> Result<(), ImageError> {
        // 2x1: a b
        let image = Rgba8Image::new([2, 1].into(), vec![1, 1, 1, 1, 2, 2, 2, 2])?;
        let single = |o: Orientation| -> Result<(ImageSize, Vec<u8>), ImageError> {
            let out = o.apply(&image)?;
            Ok((out.size(), out.as_slice().iter().step_by(4).copied().collect()))
        };
        let tall = ImageSize { width: 1, height: 2 };
        assert_eq!(single(Orientation::Rotate90)?, (tall, vec![2, 1]));
        assert_eq!(single(Orientation::Rotate270)?, (tall, vec![1, 2]));
        // a single column is its own mirror
        assert_eq!(single(Orientation::Rotate90Mirrored)?, (tall, vec![2, 1]));

        // 2x2: a b / c d
        let image = Rgba8Image::new([2, 2].into(), (1..=4).flat_map(|v| [v; 4]).collect())?;
        let grid = |o: Orientation| -> Result<Vec<u8>, ImageError> {
            Ok(o.apply(&image)?.as_slice().iter().step_by(4).copied().collect())
        };
        assert_eq!(grid(Orientation::Rotate90)?, vec![2, 4, 1, 3]);
        assert_eq!(grid(Orientation::Rotate90Mirrored)?, vec![4, 2, 3, 1]);
        assert_eq!(grid(Orientation::Rotate270)?, vec![3, 1, 4, 2]);
        assert_eq!(grid(Orientation::Rotate270Mirrored)?, vec![1, 3, 2, 4]);
        Ok(())
    }

    #[test]
    fn orientation_names() -> Result<(), Box<dyn std::error::Error>> {
        for (name, orientation) in [
            ("\"mirror_horizontal\"", Orientation::MirrorHorizontal),
            ("\"mirror_vertical\"", Orientation::MirrorVertical),
            ("\"rotate_180\"", Orientation::Rotate180),
            ("\"rotate_90\"", Orientation::Rotate90),
            ("\"rotate_270_mirrored\"", Orientation::Rotate270Mirrored),
        ] {
            assert_eq!(serde_json::from_str::<Orientation>(name)?, orientation);
            assert_eq!(serde_json::to_string(&orientation)?, name);
        }
        Ok(())
    }

    #[test]
    fn recipe_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let recipe: VariantRecipe = serde_json::from_str(
            r#"{
                "label": "plain",
                "canvas": {"width": 10, "height": 10},
                "panels": [{"quad": [[0, 0], [10, 0], [10, 10], [0, 10]]}]
            }"#,
        )?;
        assert_eq!(recipe.fill, [0, 0, 0, 0]);
        assert!(!recipe.mirror_source && !recipe.rotate_source);
        assert_eq!(recipe.panels[0].orientation, Orientation::Original);
        assert!(recipe.panels[0].region.is_none());
        assert_eq!(recipe.template_ids().count(), 0);
        Ok(())
    }
}
