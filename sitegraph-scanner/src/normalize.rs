use url::Url;

/// Canonicalize a URL for use as a graph identity key.
///
/// Strips the fragment and query and removes trailing slashes so that
/// equivalent URLs collapse to one node. Unparsable input is returned
/// unchanged; the degraded string still participates in visited-set
/// membership by plain string equality.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.set_query(None);
            let rendered = url.to_string();
            rendered.trim_end_matches('/').to_string()
        }
        Err(_) => raw.to_string(),
    }
}
