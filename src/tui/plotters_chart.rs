//! Plotters-powered chart widgets for Ratatui.
//!
//! - `MapChart`: longitude/latitude scatter, coloured by price
//! - `BarsChart`: histograms and per-category bars
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

/// Price colour scale stops, low to high (blue, magenta, yellow).
const SCALE: [(u8, u8, u8); 3] = [(13, 8, 135), (204, 71, 120), (240, 249, 33)];

/// Scatter of listings on the map.
///
/// All series and bounds are computed outside the render call.
pub struct MapChart<'a> {
    /// `(longitude, latitude, price)` per listing.
    pub points: &'a [(f64, f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Price range mapped onto the colour scale.
    pub price_bounds: [f64; 2],
}

impl<'a> Widget for MapChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !fits(area, buf) || !valid_bounds(self.x_bounds, self.y_bounds) {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let [p0, p1] = self.price_bounds;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("longitude")
                .y_desc("latitude")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.2}"))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // `Circle` radii come out far too large through the ratatui backend;
            // single pixels read cleanly as map dots.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y, price)| Pixel::new((x, y), price_color(price, p0, p1))),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Filled bars over a numeric x axis.
pub struct BarsChart<'a> {
    /// `(left, right, height)` per bar.
    pub bars: &'a [(f64, f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_max: f64,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub color: RGBColor,
}

impl<'a> Widget for BarsChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let y_bounds = [0.0, self.y_max * 1.05];
        if !fits(area, buf) || !valid_bounds(self.x_bounds, y_bounds) {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let y1 = y_bounds[1];

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, 0.0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(4)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(
                self.bars
                    .iter()
                    .map(|&(left, right, h)| Rectangle::new([(left, 0.0), (right, h)], bar_style(self.color))),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Linear interpolation along `SCALE`; values outside the range are clamped.
pub fn price_color(price: f64, lo: f64, hi: f64) -> RGBColor {
    let t = if hi > lo && price.is_finite() {
        ((price - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let scaled = t * (SCALE.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(SCALE.len() - 2);
    let frac = scaled - idx as f64;
    let (a, b) = (SCALE[idx], SCALE[idx + 1]);
    let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;

    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn bar_style(color: RGBColor) -> ShapeStyle {
    color.filled()
}

/// Plotters may fail to build a chart in a tiny area; show a hint instead.
fn fits(area: Rect, buf: &mut Buffer) -> bool {
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(TuiColor::Yellow),
        );
        return false;
    }
    true
}

fn valid_bounds(x: [f64; 2], y: [f64; 2]) -> bool {
    x.iter().chain(&y).all(|v| v.is_finite()) && x[1] > x[0] && y[1] > y[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_scale_endpoints() {
        assert_eq!(price_color(100.0, 100.0, 200.0), RGBColor(13, 8, 135));
        assert_eq!(price_color(200.0, 100.0, 200.0), RGBColor(240, 249, 33));
        assert_eq!(price_color(150.0, 100.0, 200.0), RGBColor(204, 71, 120));
        assert_eq!(price_color(999.0, 100.0, 200.0), RGBColor(240, 249, 33));
    }

    #[test]
    fn degenerate_price_range_uses_low_end() {
        assert_eq!(price_color(5.0, 5.0, 5.0), RGBColor(13, 8, 135));
    }

    #[test]
    fn bars_are_filled_in_their_colour() {
        let style = bar_style(RGBColor(64, 160, 255));
        assert!(style.filled);
        assert_eq!(style.color, RGBColor(64, 160, 255).to_rgba());
    }

    #[test]
    fn bounds_must_be_finite_and_increasing() {
        assert!(valid_bounds([0.0, 1.0], [0.0, 1.0]));
        assert!(!valid_bounds([1.0, 1.0], [0.0, 1.0]));
        assert!(!valid_bounds([0.0, f64::NAN], [0.0, 1.0]));
    }
}
