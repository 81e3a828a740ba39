//! Domain types: identifiers, price series, display colors.

pub mod color;
pub mod isin;
pub mod series;

pub use color::{Color, ColorError};
pub use isin::{Isin, IsinError};
pub use series::{PricePoint, SeriesError, TimeSeries};
