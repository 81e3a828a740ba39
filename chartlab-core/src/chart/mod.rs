//! Chart requests, composition, and rendering.

pub mod compose;
pub mod renderer;
pub mod svg;

pub use compose::{compose_comparison, single_series_request, ChartKind, ChartRequest, ChartSeries};
pub use renderer::{ChartRenderer, RenderError};
pub use svg::SvgRenderer;
