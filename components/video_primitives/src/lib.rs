mod quality;
mod selection;

pub use quality::{Quality, QualityError};
pub use selection::{Selection, SelectionError};
