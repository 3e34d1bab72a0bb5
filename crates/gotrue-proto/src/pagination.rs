//! Link-header pagination parsing for admin list endpoints
//!
//! The provider paginates with an RFC 5988-style `link` header whose
//! entries carry `rel="next"` / `rel="last"` markers and a `page=N`
//! query parameter, plus a separate total-count header. A missing
//! relation is coded as page 0 internally and normalized to `None` in
//! the public [`Pagination`] value.

use crate::types::Pagination;

pub const LINK_HEADER: &str = "link";
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Decode pagination from the raw header values, either of which may be
/// missing from the response.
pub fn decode_pagination(link: Option<&str>, total: Option<&str>) -> Pagination {
    let next = link.map_or(0, |header| page_for_rel(header, "next"));
    let last = link.map_or(0, |header| page_for_rel(header, "last"));
    Pagination {
        next_page: normalize(next),
        last_page: normalize(last),
        total: total.and_then(|t| t.trim().parse().ok()).unwrap_or(0),
    }
}

/// Page 0 doubles as the provider's "no such page" sentinel, so a
/// legitimate page 0 cannot be represented. Kept for wire compatibility.
fn normalize(page: u64) -> Option<u64> {
    (page != 0).then_some(page)
}

/// Scan the comma-separated link entries for the one tagged with the
/// given relation and extract its `page` value. 0 when absent.
fn page_for_rel(header: &str, rel: &str) -> u64 {
    let marker = format!("rel=\"{rel}\"");
    header
        .split(',')
        .find(|entry| entry.contains(&marker))
        .and_then(extract_page)
        .unwrap_or(0)
}

/// Pull the `page=N` query value out of a link entry, skipping matches
/// embedded in longer parameter names such as `per_page`.
fn extract_page(entry: &str) -> Option<u64> {
    let bytes = entry.as_bytes();
    let mut from = 0;
    while let Some(found) = entry[from..].find("page=") {
        let idx = from + found;
        let boundary = idx == 0 || matches!(bytes[idx - 1], b'?' | b'&');
        if boundary {
            let digits: String = entry[idx + "page=".len()..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if let Ok(page) = digits.parse() {
                return Some(page);
            }
        }
        from = idx + "page=".len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_next_and_last_pages() {
        let link = r#"<https://x.co/admin/users?page=2>; rel="next", <https://x.co/admin/users?page=5>; rel="last""#;
        let pagination = decode_pagination(Some(link), Some("42"));
        assert_eq!(pagination.next_page, Some(2));
        assert_eq!(pagination.last_page, Some(5));
        assert_eq!(pagination.total, 42);
    }

    #[test]
    fn missing_next_relation_is_absent() {
        let link = r#"<https://x.co/admin/users?page=5>; rel="last""#;
        let pagination = decode_pagination(Some(link), Some("42"));
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.last_page, Some(5));
    }

    #[test]
    fn page_zero_is_normalized_to_absent() {
        let link = r#"<https://x.co/admin/users?page=0>; rel="next""#;
        let pagination = decode_pagination(Some(link), Some("1"));
        assert_eq!(pagination.next_page, None);
    }

    #[test]
    fn per_page_parameter_is_not_mistaken_for_page() {
        let link = r#"<https://x.co/admin/users?per_page=50&page=3>; rel="next""#;
        let pagination = decode_pagination(Some(link), Some("150"));
        assert_eq!(pagination.next_page, Some(3));
    }

    #[test]
    fn missing_headers_yield_empty_pagination() {
        let pagination = decode_pagination(None, None);
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn unparseable_total_defaults_to_zero() {
        let pagination = decode_pagination(None, Some("lots"));
        assert_eq!(pagination.total, 0);
    }
}
