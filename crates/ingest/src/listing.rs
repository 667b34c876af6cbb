use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*["']([^"']*)["']"#).expect("valid href pattern")
});

/// Children of one directory, split into subdirectories and files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// Parse an autoindex page (python http.server, nginx, Apache) into its entries.
///
/// Directory links end in `/`. Parent, absolute, query and fragment links are
/// not entries of the directory and are skipped.
pub fn parse_listing(html: &str) -> Listing {
    let mut listing = Listing::default();

    for capture in HREF.captures_iter(html) {
        let href = capture[1].trim();
        if href.is_empty()
            || href.starts_with('?')
            || href.starts_with('#')
            || href.starts_with('/')
            || href.starts_with("..")
            || href.starts_with("./")
            || href.contains("://")
            || href.starts_with("mailto:")
        {
            continue;
        }

        let (name, is_dir) = match href.strip_suffix('/') {
            Some(dir) => (dir, true),
            None => (href, false),
        };
        if name.contains('/') {
            continue;
        }
        let name = urlencoding::decode(name)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| name.to_string());

        let target = if is_dir { &mut listing.dirs } else { &mut listing.files };
        if !target.contains(&name) {
            target.push(name);
        }
    }

    listing
}
