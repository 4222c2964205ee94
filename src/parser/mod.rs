pub mod html_reader;

pub use html_reader::HtmlSpanReader;

use anyhow::Result;

use crate::core::model::Span;

/// Any document reader that can hand the segmenter its spans in document order.
pub trait SpanSource {
    fn read_spans(&self) -> Result<Vec<Span>>;
}
