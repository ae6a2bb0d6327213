use crate::error::ScraperError;

/// Builds the ad-library keyword search URL for `query`.
///
/// The query is wrapped in double quotes and searched as an exact phrase
/// among active ads of every type and media kind in `country`.
pub(crate) fn search_url(base_url: &str, country: &str, query: &str) -> Result<String, ScraperError> {
    let mut url = reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidSearchUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;

    url.query_pairs_mut()
        .append_pair("active_status", "active")
        .append_pair("ad_type", "all")
        .append_pair("country", country)
        .append_pair("is_targeted_country", "false")
        .append_pair("media_type", "all")
        .append_pair("q", &format!("\"{query}\""))
        .append_pair("search_type", "keyword_exact_phrase")
        .append_pair("source", "fb-logo");

    Ok(url.to_string())
}

/// Host of `url`, or the raw string when it does not parse.
pub(crate) fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
