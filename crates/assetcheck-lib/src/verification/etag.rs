/// Strips entity-tag decoration from an `ETag` header value.
///
/// Per RFC 9110 an entity tag is `["W/"] DQUOTE *etagc DQUOTE`. The optional
/// weak-validator prefix and the surrounding quotes are removed; weak and
/// strong validators compare identically here. Bare tokens without quotes are
/// returned unchanged.
pub fn unquote_etag(etag: &str) -> &str {
    let etag = etag.strip_prefix("W/").unwrap_or(etag);
    etag.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(etag)
}
