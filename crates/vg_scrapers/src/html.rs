use scraper::{Html, Selector};
use serde_json::Value;
use vg_core::{Error, Result};

const META_DESCRIPTION: &str = r#"meta[name="description"]"#;
const OG_DESCRIPTION: &str = r#"meta[property="og:description"]"#;
const JSON_LD: &str = r#"script[type="application/ld+json"]"#;

fn selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Parse(format!("Invalid selector: {}", e)))
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// First non-blank `content` attribute among elements matching `selector`.
pub fn meta_content(document: &Html, selector_str: &str) -> Result<Option<String>> {
    let selector = selector(selector_str)?;
    Ok(document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .find_map(non_blank))
}

fn description_in(json: &Value) -> Option<String> {
    match json {
        Value::Array(items) => items.iter().find_map(description_in),
        Value::Object(obj) => obj
            .get("description")
            .and_then(|d| d.as_str())
            .and_then(non_blank)
            .or_else(|| obj.get("@graph").and_then(description_in)),
        _ => None,
    }
}

/// Description declared in JSON-LD metadata, looking through top-level
/// arrays and `@graph` lists.
pub fn jsonld_description(document: &Html) -> Result<Option<String>> {
    let selector = selector(JSON_LD)?;
    Ok(document
        .select(&selector)
        .filter_map(|script| {
            serde_json::from_str::<Value>(script.text().collect::<String>().trim()).ok()
        })
        .find_map(|json| description_in(&json)))
}

/// Extracts the canonical text of an article page: its metadata description.
///
/// `meta[name=description]` wins, then `og:description`, then JSON-LD. A page
/// with none of them is a parse error rather than an empty string.
pub fn extract_description(html: &str) -> Result<String> {
    let document = Html::parse_document(html);

    if let Some(description) = meta_content(&document, META_DESCRIPTION)? {
        return Ok(description);
    }
    if let Some(description) = meta_content(&document, OG_DESCRIPTION)? {
        return Ok(description);
    }
    jsonld_description(&document)?
        .ok_or_else(|| Error::Parse("No description metadata found".to_string()))
}
