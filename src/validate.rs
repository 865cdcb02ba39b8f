use url::Url;

use crate::error::ValidationError;

const INVALID_URL_MESSAGE: &str = "Please provide a valid Wikipedia article URL.";
const PRIMARY_HOST: &str = "en.wikipedia.org";
const HOST_SUFFIX: &str = ".wikipedia.org";
const ARTICLE_PREFIX: &str = "/wiki/";

pub fn is_wikipedia_article_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw.trim()) else {
        return false;
    };
    let host_ok = url
        .host_str()
        .is_some_and(|h| h == PRIMARY_HOST || h.ends_with(HOST_SUFFIX));
    host_ok && url.path().starts_with(ARTICLE_PREFIX)
}

/// Gate for every operation that takes a URL; rejects with field `url`.
pub fn validate_article_url(raw: &str) -> Result<(), ValidationError> {
    if is_wikipedia_article_url(raw) {
        Ok(())
    } else {
        Err(ValidationError::new(INVALID_URL_MESSAGE, "url"))
    }
}
