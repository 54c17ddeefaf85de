//! Condition-icon extractor for the weather-station page.
//!
//! The CGE page does not expose the current condition icon as an `<img>`
//! element; it is set as a CSS `background` on the `.condTempo` class inside
//! the page's inline `<style>` block. The extractor scrapes that style text
//! as a single string and recovers the `url(...)` reference with a regular
//! expression, then resolves it against the page URL.
//!
//! The match is case-insensitive, tolerates arbitrary whitespace and line
//! breaks between the selector, the brace, and the declaration, and accepts
//! single-, double-, or un-quoted URLs.

use crate::error::{BotError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};
use url::Url;

/// CSS class carrying the condition icon on the station page.
const CONDITION_CLASS: &str = "condTempo";

static BACKGROUND_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?is)\.{class}[^{{]*\{{[^}}]*?background[^;}}]*?url\(\s*['"]?([^'"()\s]+)['"]?\s*\)"#,
        class = CONDITION_CLASS
    ))
    .unwrap()
});

/// Fetch the station page and resolve the condition-icon URL.
///
/// Returns `Ok(None)` when the page has no `<style>` block or no matching
/// `background` declaration; that is "no icon available this run", not an
/// error. Transport and HTTP-status failures abort with an error.
#[instrument(level = "info", skip_all, fields(%page_url))]
pub async fn scrape_icon_url(client: &Client, page_url: &Url) -> Result<Option<Url>> {
    let html = super::fetch_page_text(client, page_url).await?;
    let resolved = extract_icon_url(&html, page_url)?;
    match &resolved {
        Some(url) => info!(icon_url = %url, "Resolved condition icon URL"),
        None => warn!("No condition icon declaration on page"),
    }
    Ok(resolved)
}

/// Pure extraction over an HTML string: first `<style>` block, `.condTempo`
/// background declaration, `url(...)` capture, relative-URL resolution
/// against `base`.
pub fn extract_icon_url(html: &str, base: &Url) -> Result<Option<Url>> {
    let document = Html::parse_document(html);
    let style_selector = Selector::parse("style").unwrap();

    let Some(style) = document.select(&style_selector).next() else {
        return Ok(None);
    };
    let css = style.text().collect::<String>();

    let Some(caps) = BACKGROUND_URL_RE.captures(&css) else {
        return Ok(None);
    };
    let raw = caps[1].trim();

    let resolved = base
        .join(raw)
        .map_err(|e| BotError::Parse(format!("cannot resolve {raw:?} against {base}: {e}")))?;
    Ok(Some(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/page.jsp").unwrap()
    }

    fn wrap_style(css: &str) -> String {
        format!("<html><head><style>{css}</style></head><body></body></html>")
    }

    #[test]
    fn test_extracts_and_resolves_relative_url() {
        // Markup shape observed on the real station page.
        let html = wrap_style(
            r#"
            .someOtherClass { background: blue; }
            .condTempo {
                background: transparent url(../img/condTempo/ceu_claro_dia.png) no-repeat center center;
                width: 100%;
                height: 100%;
            }
            "#,
        );
        let url = extract_icon_url(&html, &base()).unwrap().unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.example.com/img/condTempo/ceu_claro_dia.png"
        );
    }

    #[test]
    fn test_single_quoted_url() {
        let html = wrap_style(".condTempo { background: url('test.png') }");
        let url = extract_icon_url(&html, &base()).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/test.png");
    }

    #[test]
    fn test_double_quoted_url_and_background_image() {
        let html = wrap_style(r#".condTempo { background-image: url( "img/garoa.png" ); }"#);
        let url = extract_icon_url(&html, &base()).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/img/garoa.png");
    }

    #[test]
    fn test_case_insensitive_match() {
        let html = wrap_style(".CondTempo { BACKGROUND: URL(chuva.png); }");
        let url = extract_icon_url(&html, &base()).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/chuva.png");
    }

    #[test]
    fn test_newlines_between_selector_and_declaration() {
        let html = wrap_style(".condTempo\n\n{\n\n  background :\n url(nublado.png)\n}");
        let url = extract_icon_url(&html, &base()).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/nublado.png");
    }

    #[test]
    fn test_dotdot_resolution_strips_path_segment() {
        let page = Url::parse("https://x.com/v3/page.jsp").unwrap();
        let html = wrap_style(".condTempo { background: url(../img/a.png); }");
        let url = extract_icon_url(&html, &page).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://x.com/img/a.png");
    }

    #[test]
    fn test_no_matching_rule_is_not_found() {
        let html = wrap_style(".someOtherClass { background: blue; }");
        assert!(extract_icon_url(&html, &base()).unwrap().is_none());
    }

    #[test]
    fn test_missing_style_tag_is_not_found() {
        let html = "<html><head></head><body><p>No style here</p></body></html>";
        assert!(extract_icon_url(html, &base()).unwrap().is_none());
    }

    #[test]
    fn test_rule_without_url_is_not_found() {
        let html = wrap_style(".condTempo { background: #fff; }");
        assert!(extract_icon_url(&html, &base()).unwrap().is_none());
    }

    #[test]
    fn test_only_first_style_block_is_searched() {
        let html = "<html><head>\
            <style>.unrelated { color: red; }</style>\
            <style>.condTempo { background: url(second.png); }</style>\
            </head></html>";
        assert!(extract_icon_url(html, &base()).unwrap().is_none());
    }
}
