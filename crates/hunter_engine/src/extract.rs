use scraper::{Html, Selector};

pub trait TitleExtractor: Send + Sync {
    /// Trimmed text of the first `<title>`, if present and non-empty.
    fn title(&self, html: &str) -> Option<String>;
}

/// `<title>` lookup over a lenient HTML5 parse of the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTitleExtractor;

impl TitleExtractor for HtmlTitleExtractor {
    fn title(&self, html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        let title_sel = Selector::parse("title").ok()?;

        doc.select(&title_sel)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }
}
