pub mod cursor;
pub mod diagnostics;
pub mod model;
pub mod span_classifier;
pub mod text;
