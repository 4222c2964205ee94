use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};

use crate::core::model::{Span, StyleAttrs, STYLE_LOOKUP_DEPTH};
use crate::parser::SpanSource;

/// Inline elements a span may contain and still count as a text span.
const INLINE_TAGS: [&str; 4] = ["b", "i", "img", "br"];

/// Reads the ordered span sequence out of an HTML rendition of the returns.
#[derive(Debug, Clone)]
pub struct HtmlSpanReader {
    html: String,
}

impl HtmlSpanReader {
    pub fn new(path: PathBuf) -> Result<Self> {
        let bytes =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let html = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Self { html })
    }

    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl SpanSource for HtmlSpanReader {
    fn read_spans(&self) -> Result<Vec<Span>> {
        let document = Html::parse_document(&self.html);
        let selector = Selector::parse("span")
            .map_err(|e| anyhow::anyhow!("invalid span selector: {e}"))?;

        let mut spans = Vec::new();
        let mut skipped = 0usize;
        for element in document.select(&selector) {
            match span_from_element(element) {
                Some(span) => spans.push(span),
                None => skipped += 1,
            }
        }
        log::debug!("read {} span(s), skipped {skipped} non-inline span(s)", spans.len());
        Ok(spans)
    }
}

fn span_from_element(element: ElementRef<'_>) -> Option<Span> {
    let inline_only = element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .all(|child| INLINE_TAGS.contains(&child.value().name()));
    if !inline_only {
        return None;
    }

    let text: String = element.text().collect();
    let emphasized = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "i")
        .map(|italic| italic.text().collect::<String>())
        .collect();
    let ancestors = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(STYLE_LOOKUP_DEPTH)
        .map(|ancestor| StyleAttrs {
            size: ancestor.value().attr("size").map(str::to_string),
            style: ancestor.value().attr("style").map(str::to_string),
        })
        .collect();

    Some(Span {
        text,
        emphasized,
        ancestors,
    })
}
