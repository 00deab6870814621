use crate::error::{RenderError, RenderResult};
use plotters::style::RGBColor;

/// Parse a `#rrggbb` colour.
pub fn parse_hex(value: &str) -> RenderResult<RGBColor> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(RenderError::Config(format!("invalid colour: {}", value)));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| RenderError::Config(format!("invalid colour: {}", value)))
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Parse every palette entry.
pub fn parse_palette(values: &[String]) -> RenderResult<Vec<RGBColor>> {
    if values.is_empty() {
        return Err(RenderError::Config("palette must not be empty".to_string()));
    }
    values.iter().map(|v| parse_hex(v)).collect()
}

/// The classic jet colormap: blue at 0, through cyan, yellow, to red at 1.
pub fn jet(value: f64) -> RGBColor {
    let x = value.clamp(0.0, 1.0);
    let band = |offset: f64| (1.5 - (4.0 * x - offset).abs()).clamp(0.0, 1.0);
    let to_u8 = |v: f64| (v * 255.0).round() as u8;
    RGBColor(to_u8(band(3.0)), to_u8(band(2.0)), to_u8(band(1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(parse_hex("#ff8000").ok(), Some(RGBColor(255, 128, 0)));
        assert_eq!(parse_hex("0000ff").ok(), Some(RGBColor(0, 0, 255)));
        assert!(parse_hex("#fff").is_err());
        assert!(parse_hex("#gggggg").is_err());
    }

    #[test]
    fn jet_endpoints() {
        assert_eq!(jet(0.0), RGBColor(0, 0, 128));
        assert_eq!(jet(1.0), RGBColor(128, 0, 0));
        assert_eq!(jet(0.5), RGBColor(128, 255, 128));
    }
}
