use anyhow::{bail, Result};
use tracing::trace;

use super::figure::Figure;
use super::style::{validate_render, Palette, RenderConfig};
use super::visuals::{logic, matrix, pattern, sequence, spatial, venn, SequenceKind};
use crate::question::Question;

/// Renders the diagram families to PNG data URIs.
///
/// Holds only the resolved palette and resolution; every call builds and
/// drops its own figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualGenerator {
    palette: Palette,
    dpi: u32,
}

impl Default for VisualGenerator {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            dpi: RenderConfig::default().dpi,
        }
    }
}

impl VisualGenerator {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        if let Err(errors) = validate_render(config) {
            bail!("Invalid render configuration:\n  {}", errors.join("\n  "));
        }
        Ok(Self {
            palette: Palette::from_config(config)?,
            dpi: config.dpi,
        })
    }

    pub fn matrix_rotation(&self) -> Result<String> {
        self.encode("matrix", matrix::draw(self.palette, self.dpi))
    }

    pub fn venn_diagram(&self) -> Result<String> {
        self.encode("venn", venn::draw(self.palette, self.dpi))
    }

    pub fn sequence(&self, kind: SequenceKind, data: &[i64]) -> Result<String> {
        self.encode("sequence", sequence::draw(kind, data, self.palette, self.dpi))
    }

    /// 4D walkthrough when the content mentions four dimensions, else 3D.
    pub fn spatial_transformation(&self, question: &Question) -> Result<String> {
        self.encode(
            "spatial",
            spatial::draw(&question.content, self.palette, self.dpi),
        )
    }

    pub fn pattern_completion(&self) -> Result<String> {
        self.encode("pattern", pattern::draw(self.palette, self.dpi))
    }

    pub fn logic_diagram(&self) -> Result<String> {
        self.encode("logic", logic::draw(self.palette, self.dpi))
    }

    fn encode(&self, name: &str, figure: Figure) -> Result<String> {
        let (width, height) = figure.size();
        let uri = figure.to_data_uri()?;
        trace!(figure = name, width, height, chars = uri.len(), "encoded figure");
        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::encode::{decode_data_uri, DATA_URI_PREFIX};

    fn small() -> VisualGenerator {
        VisualGenerator::new(&RenderConfig {
            dpi: 12,
            ..RenderConfig::default()
        })
        .unwrap()
    }

    fn png_size(uri: &str) -> (u32, u32) {
        let bytes = decode_data_uri(uri).unwrap();
        image::load_from_memory(&bytes).unwrap().to_rgb8().dimensions()
    }

    #[test]
    fn test_default_generator_matches_default_config() {
        assert_eq!(
            VisualGenerator::default(),
            VisualGenerator::new(&RenderConfig::default()).unwrap()
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RenderConfig {
            dpi: 0,
            warning: "yellow".to_string(),
            ..RenderConfig::default()
        };
        let err = VisualGenerator::new(&config).unwrap_err().to_string();
        assert!(err.contains("render.dpi"));
        assert!(err.contains("render.warning"));
    }

    #[test]
    fn test_every_routine_returns_png_uri() {
        let generator = small();
        let uris = [
            generator.matrix_rotation().unwrap(),
            generator.venn_diagram().unwrap(),
            generator
                .sequence(SequenceKind::Fibonacci, &[1, 1, 2, 3, 5, 8, 13])
                .unwrap(),
            generator.pattern_completion().unwrap(),
            generator.logic_diagram().unwrap(),
        ];
        for uri in &uris {
            assert!(uri.starts_with(DATA_URI_PREFIX));
        }
        assert_eq!(png_size(&uris[0]), (168, 84));
        assert_eq!(png_size(&uris[1]), (192, 96));
    }

    #[test]
    fn test_spatial_variant_follows_content() {
        let generator = small();
        let four = generator
            .spatial_transformation(&Question::with_category("Rotation en 4 dimensions", "spatial"))
            .unwrap();
        let three = generator
            .spatial_transformation(&Question::with_category("Cube 3D", "spatial"))
            .unwrap();
        assert_eq!(png_size(&four), (216, 120));
        assert_eq!(png_size(&three), (192, 96));
    }

    #[test]
    fn test_each_call_renders_afresh() {
        let generator = small();
        assert_eq!(
            generator.logic_diagram().unwrap(),
            generator.logic_diagram().unwrap()
        );
    }
}
