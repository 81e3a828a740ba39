//! Plain SVG line-chart renderer.
//!
//! Charts are written as standalone SVG documents, so no raster backend is
//! needed. X positions come from calendar dates (union across series):
//! series of different lengths and trading calendars overlay correctly
//! instead of being stacked by row position.

use super::compose::{ChartKind, ChartRequest};
use super::renderer::{ChartRenderer, RenderError};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

/// SVG renderer. Single-instrument charts render at 960x480, comparison
/// charts at 1920x1080.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }

    fn dimensions(kind: ChartKind) -> (f64, f64) {
        match kind {
            ChartKind::Single => (960.0, 480.0),
            ChartKind::Comparison => (1920.0, 1080.0),
        }
    }

    fn document(request: &ChartRequest) -> String {
        let (width, height) = Self::dimensions(request.kind);
        let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = write!(
            svg,
            r#"<rect width="{width}" height="{height}" fill="white"/>"#
        );
        // Title
        let _ = write!(
            svg,
            r#"<text x="{x}" y="30" font-family="sans-serif" font-size="16" font-weight="bold" text-anchor="middle">{title}</text>"#,
            x = width / 2.0,
            title = xml_escape(&request.title),
        );
        // Plot frame
        let _ = write!(
            svg,
            r##"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{plot_w}" height="{plot_h}" fill="none" stroke="#333" stroke-width="1"/>"##
        );

        let bounds = Bounds::of(request);
        if let Some(bounds) = &bounds {
            Self::write_grid_and_axes(&mut svg, bounds, plot_w, plot_h);
            for series in &request.series {
                let pts: String = series
                    .points
                    .iter()
                    .filter(|p| p.value.is_finite())
                    .map(|p| {
                        let x = bounds.x(p.date, plot_w);
                        let y = bounds.y(p.value, plot_h);
                        format!("{x:.2},{y:.2}")
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(
                    svg,
                    r#"<polyline points="{pts}" fill="none" stroke="{color}" stroke-width="1.5"/>"#,
                    color = series.color.hex(),
                );
            }
        }

        // Axis labels
        let _ = write!(
            svg,
            r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="12" text-anchor="middle">Date</text>"#,
            x = MARGIN_LEFT + plot_w / 2.0,
            y = height - 15.0,
        );
        let _ = write!(
            svg,
            r#"<text x="20" y="{y}" font-family="sans-serif" font-size="12" text-anchor="middle" transform="rotate(-90 20 {y})">{label}</text>"#,
            y = MARGIN_TOP + plot_h / 2.0,
            label = xml_escape(&request.y_label),
        );

        if request.kind == ChartKind::Comparison {
            Self::write_legend(&mut svg, request, width);
        }

        svg.push_str("</svg>");
        svg
    }

    fn write_grid_and_axes(svg: &mut String, bounds: &Bounds, plot_w: f64, plot_h: f64) {
        for i in 0..=Y_TICKS {
            let frac = i as f64 / Y_TICKS as f64;
            let value = bounds.vmin + frac * (bounds.vmax - bounds.vmin);
            let y = MARGIN_TOP + (1.0 - frac) * plot_h;
            let _ = write!(
                svg,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{x2}" y2="{y:.2}" stroke="#ddd" stroke-width="0.5"/>"##,
                x2 = MARGIN_LEFT + plot_w,
            );
            let _ = write!(
                svg,
                r#"<text x="{x}" y="{ty:.2}" font-family="sans-serif" font-size="11" text-anchor="end">{value:.2}</text>"#,
                x = MARGIN_LEFT - 8.0,
                ty = y + 4.0,
            );
        }

        let span = bounds.span_days().max(1);
        for i in 0..=X_TICKS {
            let frac = i as f64 / X_TICKS as f64;
            let date = bounds.dmin + chrono::Duration::days((frac * span as f64).round() as i64);
            let x = MARGIN_LEFT + frac * plot_w;
            let _ = write!(
                svg,
                r##"<line x1="{x:.2}" y1="{MARGIN_TOP}" x2="{x:.2}" y2="{y2}" stroke="#ddd" stroke-width="0.5"/>"##,
                y2 = MARGIN_TOP + plot_h,
            );
            let _ = write!(
                svg,
                r#"<text x="{x:.2}" y="{ty}" font-family="sans-serif" font-size="11" text-anchor="middle">{date}</text>"#,
                ty = MARGIN_TOP + plot_h + 20.0,
            );
        }
    }

    fn write_legend(svg: &mut String, request: &ChartRequest, width: f64) {
        let x = width - MARGIN_RIGHT - 220.0;
        for (i, series) in request.series.iter().enumerate() {
            let y = MARGIN_TOP + 16.0 + i as f64 * 18.0;
            let _ = write!(
                svg,
                r#"<line x1="{x}" y1="{ly:.2}" x2="{x2}" y2="{ly:.2}" stroke="{color}" stroke-width="2"/>"#,
                ly = y - 4.0,
                x2 = x + 24.0,
                color = series.color.hex(),
            );
            let _ = write!(
                svg,
                r#"<text x="{tx}" y="{y:.2}" font-family="sans-serif" font-size="12">{label}</text>"#,
                tx = x + 32.0,
                label = xml_escape(&series.label),
            );
        }
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, request: &ChartRequest, path: &Path) -> Result<(), RenderError> {
        let doc = Self::document(request);
        std::fs::write(path, doc).map_err(|e| RenderError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), series = request.series.len(), "chart written");
        Ok(())
    }
}

/// Date and value extents over every finite point in the request, with a
/// small value padding so lines do not sit on the frame.
struct Bounds {
    dmin: NaiveDate,
    dmax: NaiveDate,
    vmin: f64,
    vmax: f64,
}

impl Bounds {
    fn of(request: &ChartRequest) -> Option<Bounds> {
        let mut dmin: Option<NaiveDate> = None;
        let mut dmax: Option<NaiveDate> = None;
        let mut vmin = f64::INFINITY;
        let mut vmax = f64::NEG_INFINITY;

        for series in &request.series {
            for p in &series.points {
                if !p.value.is_finite() {
                    continue;
                }
                dmin = Some(dmin.map_or(p.date, |d| d.min(p.date)));
                dmax = Some(dmax.map_or(p.date, |d| d.max(p.date)));
                vmin = vmin.min(p.value);
                vmax = vmax.max(p.value);
            }
        }

        let (dmin, dmax) = (dmin?, dmax?);
        // Pad the value range; a flat series still needs nonzero height.
        let pad = if vmax > vmin { (vmax - vmin) * 0.05 } else { 1.0 };
        Some(Bounds {
            dmin,
            dmax,
            vmin: vmin - pad,
            vmax: vmax + pad,
        })
    }

    fn span_days(&self) -> i64 {
        (self.dmax - self.dmin).num_days()
    }

    fn x(&self, date: NaiveDate, plot_w: f64) -> f64 {
        let span = self.span_days();
        let frac = if span == 0 {
            0.5
        } else {
            (date - self.dmin).num_days() as f64 / span as f64
        };
        MARGIN_LEFT + frac * plot_w
    }

    fn y(&self, value: f64, plot_h: f64) -> f64 {
        let frac = (value - self.vmin) / (self.vmax - self.vmin);
        MARGIN_TOP + (1.0 - frac) * plot_h
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::compose::{compose_comparison, single_series_request};
    use crate::domain::{Isin, PricePoint};

    fn points(values: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                value,
            })
            .collect()
    }

    #[test]
    fn renders_one_polyline_per_series() {
        let a = Isin::parse("US0378331005").unwrap();
        let b = Isin::parse("US5949181045").unwrap();
        let pa = points(&[1.0, 2.0, 3.0]);
        let pb = points(&[10.0, 20.0]);
        let req = compose_comparison(
            "Comparison",
            "Close Price",
            &[(&a, pa.as_slice()), (&b, pb.as_slice())],
        )
        .unwrap();

        let doc = SvgRenderer::document(&req);
        assert_eq!(doc.matches("<polyline").count(), 2);
        assert!(doc.contains(&color_hex(&a)));
        assert!(doc.contains("US5949181045"));
    }

    fn color_hex(isin: &Isin) -> String {
        crate::domain::Color::for_identifier(isin.as_str())
            .unwrap()
            .hex()
    }

    #[test]
    fn empty_request_is_still_a_valid_document() {
        let req = compose_comparison("Comparison", "Close Price", &[]).unwrap();
        let doc = SvgRenderer::document(&req);
        assert!(doc.starts_with("<svg"));
        assert!(doc.ends_with("</svg>"));
        assert_eq!(doc.matches("<polyline").count(), 0);
        assert!(doc.contains("Comparison"));
    }

    #[test]
    fn escapes_markup_in_titles() {
        let a = Isin::parse("US0378331005").unwrap();
        let pa = points(&[1.0]);
        let req = single_series_request(&a, "A <&> B", &pa).unwrap();
        let doc = SvgRenderer::document(&req);
        assert!(doc.contains("A &lt;&amp;&gt; B"));
        assert!(!doc.contains("A <&> B"));
    }

    #[test]
    fn render_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("US0378331005.svg");
        let a = Isin::parse("US0378331005").unwrap();
        let pa = points(&[1.0, 2.0]);
        let req = single_series_request(&a, "Apple Inc.", &pa).unwrap();

        SvgRenderer::new().render(&req, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn render_to_missing_directory_errors() {
        let a = Isin::parse("US0378331005").unwrap();
        let pa = points(&[1.0]);
        let req = single_series_request(&a, "Apple Inc.", &pa).unwrap();
        let result = SvgRenderer::new().render(&req, Path::new("/nope/chart.svg"));
        assert!(matches!(result, Err(RenderError::Io { .. })));
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let a = Isin::parse("US0378331005").unwrap();
        let pa = points(&[5.0, 5.0, 5.0]);
        let req = single_series_request(&a, "Flat", &pa).unwrap();
        let doc = SvgRenderer::document(&req);
        assert!(!doc.contains("NaN"));
    }
}
