use crate::error::{backend_error, RenderError, RenderResult};
use crate::geometry::{circle_verts, closed, polar_point, radar_angles, unit_poly_verts, PanelFrame};
use crate::renderer::RadarPanel;
use chatlens_core::{FrameShape, RenderConfig};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::path::Path;

/// Height reserved above the grid for the figure title.
const TITLE_HEIGHT: u32 = 48;

/// Fraction of a grid cell left around the panel for axis labels and title.
const CELL_MARGIN: f64 = 0.18;

/// Radius, in unit panel coordinates, at which axis labels are anchored.
const LABEL_RADIUS: f64 = 0.6;

/// Segments used to approximate circular frames and rings.
const CIRCLE_SEGMENTS: usize = 96;

/// Grid dimensions for `panels` laid out `columns` per row.
pub fn grid_shape(panels: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    let rows = ((panels + columns - 1) / columns).max(1);
    (rows, columns)
}

/// Outline of one frame or ring at `radius` for the configured shape.
fn outline(shape: FrameShape, theta: &[f64], radius: f64) -> Vec<(f64, f64)> {
    match shape {
        FrameShape::Circle => circle_verts(radius, CIRCLE_SEGMENTS),
        FrameShape::Polygon => theta
            .iter()
            .map(|&t| polar_point(t, radius))
            .collect(),
    }
}

pub(crate) fn draw_radar_grid(
    config: &RenderConfig,
    palette: &[RGBColor],
    panels: &[RadarPanel],
    labels: &[String],
    path: &Path,
) -> RenderResult<()> {
    if labels.len() < 3 {
        return Err(RenderError::InvalidInput(format!(
            "radar chart needs at least 3 axes, got {}",
            labels.len()
        )));
    }
    for panel in panels {
        if let Some(bad) = panel.series.iter().find(|s| s.len() != labels.len()) {
            return Err(RenderError::InvalidInput(format!(
                "panel '{}' has {} values for {} axes",
                panel.title,
                bad.len(),
                labels.len()
            )));
        }
    }

    let (rows, columns) = grid_shape(panels.len(), config.radar_columns);
    let cell = config.radar_panel_size;
    let width = cell * columns as u32;
    let height = TITLE_HEIGHT + cell * rows as u32;

    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(backend_error)?;

    let font = config.font_family.as_str();
    let title_style = (font, 22.0)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        config.radar_title.clone(),
        ((width / 2) as i32, (TITLE_HEIGHT / 2) as i32),
        title_style,
    ))
    .map_err(backend_error)?;

    let theta = radar_angles(labels.len());
    let inset = (f64::from(cell) * CELL_MARGIN).round() as u32;
    let size = cell.saturating_sub(2 * inset).max(1);

    for (index, panel) in panels.iter().enumerate() {
        let row = index / columns;
        let col = index % columns;
        let frame = PanelFrame {
            left: (col as u32 * cell + inset) as i32,
            top: (TITLE_HEIGHT + row as u32 * cell + inset) as i32,
            size,
        };
        draw_panel(&root, config, palette, &frame, &theta, panel, labels)?;
    }

    root.present().map_err(backend_error)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    config: &RenderConfig,
    palette: &[RGBColor],
    frame: &PanelFrame,
    theta: &[f64],
    panel: &RadarPanel,
    labels: &[String],
) -> RenderResult<()> {
    let font = config.font_family.as_str();
    let grid_style = ShapeStyle::from(&BLACK.mix(0.25)).stroke_width(1);

    for &level in &config.radar_grid_levels {
        let ring = closed(outline(config.frame, theta, level * 0.5));
        root.draw(&PathElement::new(frame.to_pixels(&ring), grid_style))
            .map_err(backend_error)?;
    }

    let border = match config.frame {
        FrameShape::Polygon => closed(unit_poly_verts(theta)),
        FrameShape::Circle => closed(circle_verts(0.5, CIRCLE_SEGMENTS)),
    };
    root.draw(&PathElement::new(frame.to_pixels(&border), &BLACK))
        .map_err(backend_error)?;

    let center = frame.to_pixel((0.5, 0.5));
    for &t in theta {
        let spoke = vec![center, frame.to_pixel(polar_point(t, 0.5))];
        root.draw(&PathElement::new(spoke, grid_style))
            .map_err(backend_error)?;
    }

    for (series, color) in panel.series.iter().zip(palette.iter().cycle()) {
        let points: Vec<(f64, f64)> = theta
            .iter()
            .zip(series)
            .map(|(&t, &v)| polar_point(t, v.clamp(0.0, 1.0) * 0.5))
            .collect();
        let pixels = frame.to_pixels(&points);
        root.draw(&Polygon::new(pixels.clone(), color.mix(0.25).filled()))
            .map_err(backend_error)?;
        root.draw(&PathElement::new(closed(pixels), color.stroke_width(2)))
            .map_err(backend_error)?;
    }

    let label_style = (font, 12.0)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (&t, label) in theta.iter().zip(labels) {
        let anchor = frame.to_pixel(polar_point(t, LABEL_RADIUS));
        root.draw(&Text::new(label.clone(), anchor, label_style.clone()))
            .map_err(backend_error)?;
    }

    let title_style = (font, 14.0)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLUE)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let title_anchor = frame.to_pixel((0.5, 1.0 + CELL_MARGIN * 0.9));
    root.draw(&Text::new(panel.title.clone(), title_anchor, title_style))
        .map_err(backend_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rounds_rows_up() {
        assert_eq!(grid_shape(0, 3), (1, 3));
        assert_eq!(grid_shape(3, 3), (1, 3));
        assert_eq!(grid_shape(4, 3), (2, 3));
        assert_eq!(grid_shape(10, 3), (4, 3));
    }

    #[test]
    fn rejects_series_of_wrong_length() {
        let dir = tempfile::tempdir().expect("tempdir");
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let panels = vec![RadarPanel::single("Alice", vec![0.5, 0.5])];
        let result = draw_radar_grid(
            &RenderConfig::default(),
            &[BLUE],
            &panels,
            &labels,
            &dir.path().join("radar.svg"),
        );
        assert!(matches!(result, Err(RenderError::InvalidInput(_))));
    }

    #[test]
    fn circle_frame_renders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = RenderConfig::default();
        config.frame = FrameShape::Circle;
        let labels: Vec<String> = ["x", "y", "z", "w"].iter().map(|s| s.to_string()).collect();
        let panels = vec![RadarPanel::single("Carol", vec![0.1, 0.2, 0.3, 1.0])];
        let path = dir.path().join("radar.svg");

        draw_radar_grid(&config, &[RED], &panels, &labels, &path).expect("render");
        let svg = std::fs::read_to_string(&path).expect("read");
        assert!(svg.contains("Carol"));
        assert!(svg.contains(&config.radar_title));
    }
}
