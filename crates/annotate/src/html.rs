use html_escape::{encode_double_quoted_attribute, encode_text};

pub const WIKIDATA_BASE_URL: &str = "https://www.wikidata.org/wiki/";

/// Escape plain text for HTML body content and turn newlines into line breaks.
pub fn escape_text(text: &str) -> String {
    encode_text(text).replace('\n', "<br>")
}

pub fn escape_attr(value: &str) -> String {
    encode_double_quoted_attribute(value).into_owned()
}

pub fn wikidata_url(entity_id: &str) -> String {
    format!("{}{}", WIKIDATA_BASE_URL, escape_attr(entity_id))
}

/// `<a>` pointing at the Wikidata page of `entity_id`, opened in a new tab.
pub fn wikidata_link(entity_id: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\">{}</a>",
        wikidata_url(entity_id),
        encode_text(entity_id)
    )
}
