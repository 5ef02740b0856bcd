//! Preparation of the newline-separated image URL input

use url::form_urlencoded;

/// Splits the raw input on newlines, trimming and dropping blank lines
pub fn parse_url_list(image_urls: &str) -> Vec<String> {
    image_urls
        .split('\n')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn has_non_ascii(url: &str) -> bool {
    url.chars().any(|c| !c.is_ascii())
}

/// Percent-encodes the path and query of a URL, leaving scheme and host untouched.
/// The fragment is dropped.
pub fn encode_url(raw: &str) -> String {
    let (scheme, rest) = match raw.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, raw),
    };
    let rest = rest.split('#').next().unwrap_or_default();

    let (location, query) = match rest.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (rest, None),
    };
    let (host, path) = match scheme {
        Some(_) => location.split_at(location.find('/').unwrap_or(location.len())),
        None => ("", location),
    };

    let path = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    let mut encoded = match scheme {
        Some(scheme) => format!("{}://{}{}", scheme, host, path),
        None => path,
    };
    if let Some(query) = query.map(encode_query).filter(|q| !q.is_empty()) {
        encoded.push('?');
        encoded.push_str(&query);
    }
    encoded
}

/// Re-serializes a query string as form-encoded pairs, dropping blank values
fn encode_query(query: &str) -> String {
    let pairs = form_urlencoded::parse(query.as_bytes()).filter(|(_, value)| !value.is_empty());
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Encodes each URL containing non-ASCII characters when `enabled` is set
pub fn prepare_urls(urls: &[String], enabled: bool) -> Vec<String> {
    urls.iter()
        .map(|url| {
            if enabled && has_non_ascii(url) {
                encode_url(url)
            } else {
                url.clone()
            }
        })
        .collect()
}
