use std::f64::consts::{FRAC_PI_2, PI};

/// Centre of the unit panel in normalized coordinates.
pub const PANEL_CENTER: (f64, f64) = (0.5, 0.5);

/// Radius of the unit panel frame.
pub const PANEL_RADIUS: f64 = 0.5;

/// Evenly spaced axis angles for `num_vars` radar axes, rotated so the first
/// axis points straight up.
pub fn radar_angles(num_vars: usize) -> Vec<f64> {
    (0..num_vars)
        .map(|i| 2.0 * PI * i as f64 / num_vars as f64 + FRAC_PI_2)
        .collect()
}

/// Vertices of the polygon circumscribed by the unit panel circle.
pub fn unit_poly_verts(theta: &[f64]) -> Vec<(f64, f64)> {
    theta
        .iter()
        .map(|&t| polar_point(t, PANEL_RADIUS))
        .collect()
}

/// Point at `radius` along angle `theta` from the panel centre, y axis up.
pub fn polar_point(theta: f64, radius: f64) -> (f64, f64) {
    (
        PANEL_CENTER.0 + radius * theta.cos(),
        PANEL_CENTER.1 + radius * theta.sin(),
    )
}

/// Repeat the first point at the end so a polyline closes.
pub fn closed<T: Copy>(mut points: Vec<T>) -> Vec<T> {
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

/// Approximate circle of `radius` around the panel centre.
pub fn circle_verts(radius: f64, segments: usize) -> Vec<(f64, f64)> {
    (0..segments)
        .map(|i| polar_point(2.0 * PI * i as f64 / segments as f64, radius))
        .collect()
}

/// Angle of an hour bar: hour 0 at the top, running clockwise.
pub fn hour_angle(hour: usize) -> f64 {
    FRAC_PI_2 - 2.0 * PI * hour as f64 / 24.0
}

/// Outline of an annular wedge centred on `theta`, spanning `width` radians
/// between radii `inner` and `outer`.
pub fn wedge(theta: f64, width: f64, inner: f64, outer: f64, steps: usize) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    let start = theta - width / 2.0;
    let arc = move |radius: f64| {
        (0..=steps).map(move |i| polar_point(start + width * i as f64 / steps as f64, radius))
    };
    let mut points: Vec<(f64, f64)> = arc(outer).collect();
    let mut inner_arc: Vec<(f64, f64)> = arc(inner).collect();
    inner_arc.reverse();
    points.extend(inner_arc);
    points
}

/// Maps unit panel coordinates into a pixel square.
#[derive(Debug, Clone, Copy)]
pub struct PanelFrame {
    /// Left edge in pixels.
    pub left: i32,
    /// Top edge in pixels.
    pub top: i32,
    /// Edge length in pixels.
    pub size: u32,
}

impl PanelFrame {
    /// Convert a unit point (y up) into backend pixels (y down).
    pub fn to_pixel(&self, point: (f64, f64)) -> (i32, i32) {
        let size = f64::from(self.size);
        (
            self.left + (point.0 * size).round() as i32,
            self.top + ((1.0 - point.1) * size).round() as i32,
        )
    }

    /// Convert a sequence of unit points.
    pub fn to_pixels(&self, points: &[(f64, f64)]) -> Vec<(i32, i32)> {
        points.iter().map(|&p| self.to_pixel(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_axis_points_up() {
        let theta = radar_angles(7);
        assert_eq!(theta.len(), 7);
        assert!((theta[0] - FRAC_PI_2).abs() < 1e-12);

        let verts = unit_poly_verts(&theta);
        assert!((verts[0].0 - 0.5).abs() < 1e-12);
        assert!((verts[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn polygon_vertices_lie_on_unit_circle() {
        for (x, y) in unit_poly_verts(&radar_angles(5)) {
            let r = ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt();
            assert!((r - PANEL_RADIUS).abs() < 1e-12);
        }
    }

    #[test]
    fn closed_repeats_first_point() {
        assert_eq!(closed(vec![1, 2, 3]), vec![1, 2, 3, 1]);
        assert!(closed(Vec::<i32>::new()).is_empty());
    }

    #[test]
    fn hours_run_clockwise_from_top() {
        assert!((hour_angle(0) - FRAC_PI_2).abs() < 1e-12);
        let (x, y) = polar_point(hour_angle(6), 0.5);
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pixel_mapping_flips_y() {
        let frame = PanelFrame {
            left: 10,
            top: 20,
            size: 100,
        };
        assert_eq!(frame.to_pixel((0.0, 1.0)), (10, 20));
        assert_eq!(frame.to_pixel((1.0, 0.0)), (110, 120));
    }
}
