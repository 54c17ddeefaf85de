//! Bulletin extractor for the CGE news page.
//!
//! The latest bulletin lives in the first `div.noticia` container: a
//! headline plus a handful of paragraphs. The extractor flattens the
//! block's visible text into one whitespace-collapsed line and hard-cuts it
//! at the configured character budget so the summarizer input stays bounded.

use crate::error::Result;
use crate::utils::{collapse_whitespace, truncate_chars};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};
use url::Url;

/// Container class marking a bulletin on the news page.
const NEWS_BLOCK_SELECTOR: &str = "div.noticia";

/// Fetch the news page and extract the latest bulletin text.
///
/// Returns `Ok(None)` when no bulletin block is present (the run proceeds
/// without a caption). Transport and HTTP-status failures abort with an
/// error.
#[instrument(level = "info", skip_all, fields(%page_url))]
pub async fn scrape_news(client: &Client, page_url: &Url, max_chars: usize) -> Result<Option<String>> {
    let html = super::fetch_page_text(client, page_url).await?;
    let text = extract_news_text(&html, max_chars);
    match &text {
        Some(t) => info!(chars = t.chars().count(), "Extracted bulletin text"),
        None => warn!("No bulletin block on page"),
    }
    Ok(text)
}

/// Pure extraction over an HTML string: first bulletin block, text nodes
/// joined with single spaces, whitespace collapsed, hard character cut.
pub fn extract_news_text(html: &str, max_chars: usize) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(NEWS_BLOCK_SELECTOR).unwrap();

    let block = document.select(&selector).next()?;
    let joined = block.text().collect::<Vec<_>>().join(" ");
    let collapsed = collapse_whitespace(&joined);
    if collapsed.is_empty() {
        return None;
    }
    Some(truncate_chars(&collapsed, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div class="destaque">ignored</div>
        <div class="noticia">
            <h2>Atenção para chuva forte</h2>
            <p>A cidade de São Paulo entrou em estado
               de atenção às 14h30.</p>
            <p>Acumulado previsto: 40mm.</p>
        </div>
        <div class="noticia"><h2>Boletim antigo</h2></div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_first_block_with_collapsed_whitespace() {
        let text = extract_news_text(PAGE, 500).unwrap();
        assert_eq!(
            text,
            "Atenção para chuva forte A cidade de São Paulo entrou em estado \
             de atenção às 14h30. Acumulado previsto: 40mm."
        );
        assert!(!text.contains("Boletim antigo"));
    }

    #[test]
    fn test_truncates_at_exact_char_budget() {
        let text = extract_news_text(PAGE, 10).unwrap();
        assert_eq!(text, "Atenção pa");
        assert_eq!(text.chars().count(), 10);
    }

    #[test]
    fn test_never_exceeds_budget_for_long_input() {
        let long = format!(
            "<div class=\"noticia\"><p>{}</p></div>",
            "chuva ".repeat(1000)
        );
        let text = extract_news_text(&long, 2000).unwrap();
        assert!(text.chars().count() <= 2000);
    }

    #[test]
    fn test_missing_block_returns_none() {
        let html = "<html><body><p>sem noticias</p></body></html>";
        assert!(extract_news_text(html, 500).is_none());
    }

    #[test]
    fn test_empty_block_returns_none() {
        let html = r#"<div class="noticia">   </div>"#;
        assert!(extract_news_text(html, 500).is_none());
    }
}
