use crate::color::jet;
use crate::error::{backend_error, RenderError, RenderResult};
use crate::geometry::{circle_verts, closed, hour_angle, polar_point, wedge, PanelFrame};
use chatlens_core::RenderConfig;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::path::Path;

/// Number of bars on the clock.
pub const HOURS: usize = 24;

/// Radius every bar starts from.
pub const BAR_BOTTOM: f64 = 0.1;

/// Angular width of each bar.
pub const BAR_WIDTH: f64 = PI / 13.0;

/// Bar opacity.
const BAR_ALPHA: f64 = 0.8;

/// Unit panel radius used by the longest possible bar.
const PLOT_RADIUS: f64 = 0.42;

/// Map a data radius (bottom offset included) into unit panel radius.
fn scale(radius: f64) -> f64 {
    radius / (1.0 + BAR_BOTTOM) * PLOT_RADIUS
}

pub(crate) fn draw_clock(config: &RenderConfig, radii: &[f64], path: &Path) -> RenderResult<()> {
    if radii.len() != HOURS {
        return Err(RenderError::InvalidInput(format!(
            "clock chart needs {} radii, got {}",
            HOURS,
            radii.len()
        )));
    }

    let size = config.clock_size;
    let root = SVGBackend::new(path, (size, size)).into_drawing_area();
    root.fill(&WHITE).map_err(backend_error)?;
    let frame = PanelFrame {
        left: 0,
        top: 0,
        size,
    };

    let grid_style = ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1);
    for level in [0.25, 0.5, 0.75, 1.0] {
        let ring = closed(circle_verts(scale(BAR_BOTTOM + level), 120));
        root.draw(&PathElement::new(frame.to_pixels(&ring), grid_style))
            .map_err(backend_error)?;
    }
    for hour in 0..HOURS {
        let t = hour_angle(hour);
        let spoke = vec![
            frame.to_pixel(polar_point(t, 0.0)),
            frame.to_pixel(polar_point(t, scale(1.0 + BAR_BOTTOM))),
        ];
        root.draw(&PathElement::new(spoke, grid_style))
            .map_err(backend_error)?;
    }

    for (hour, &radius) in radii.iter().enumerate() {
        let radius = radius.clamp(0.0, 1.0);
        let outline = wedge(
            hour_angle(hour),
            BAR_WIDTH,
            scale(BAR_BOTTOM),
            scale(BAR_BOTTOM + radius),
            8,
        );
        let fill = jet(radius).mix(BAR_ALPHA).filled();
        root.draw(&Polygon::new(frame.to_pixels(&outline), fill))
            .map_err(backend_error)?;
    }

    let label_style = (config.font_family.as_str(), 14.0)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for hour in 0..HOURS {
        let anchor = frame.to_pixel(polar_point(hour_angle(hour), PLOT_RADIUS + 0.04));
        root.draw(&Text::new(hour.to_string(), anchor, label_style.clone()))
            .map_err(backend_error)?;
    }

    root.present().map_err(backend_error)?;
    Ok(())
}
