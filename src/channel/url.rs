use super::request::Request;
use crate::api::endpoints::API_ROOT;

/// Renders the fully-qualified URL for `request`.
///
/// Path values are trimmed of surrounding `/` and joined with `/`; query terms
/// follow `?` joined with `&`. Nothing is escaped here.
pub fn format_url(scheme: &str, host: &str, request: &Request) -> String {
    let mut url = format!(
        "{}://{}.{}/{}/{}/v{}",
        scheme,
        request.region.alias(),
        host,
        API_ROOT,
        request.api.path_segment(),
        request.api.version()
    );

    for segment in request.path.iter().map(|s| s.trim_matches('/')) {
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }

    if !request.query.is_empty() {
        url.push('?');
        for (i, term) in request.query.iter().enumerate() {
            if i > 0 {
                url.push('&');
            }
            url.push_str(term);
        }
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints::{ApiCategory, Region};

    const HOST: &str = "api.riotgames.com";

    #[test]
    fn summoner_by_id() {
        let request = Request::new(Region::Na, ApiCategory::Summoner).path("21748566");
        assert_eq!(
            format_url("https", HOST, &request),
            "https://na1.api.riotgames.com/lol/summoner/v3/21748566"
        );
    }

    #[test]
    fn no_arguments() {
        let request = Request::new(Region::Kr, ApiCategory::Status);
        assert_eq!(
            format_url("https", HOST, &request),
            "https://kr.api.riotgames.com/lol/status/v3"
        );
    }

    #[test]
    fn path_segments_follow_call_order() {
        let request = Request::new(Region::Euw, ApiCategory::Summoner)
            .path("/summoners/by-name/")
            .path("Some%20One");
        assert_eq!(
            format_url("https", HOST, &request),
            "https://euw1.api.riotgames.com/lol/summoner/v3/summoners/by-name/Some%20One"
        );
    }

    #[test]
    fn query_terms_joined_with_ampersand() {
        let request = Request::new(Region::Eune, ApiCategory::StaticData)
            .path("champions")
            .query("locale", "en_US")
            .query("tags", "all");
        assert_eq!(
            format_url("https", HOST, &request),
            "https://eun1.api.riotgames.com/lol/static-data/v3/champions?locale=en_US&tags=all"
        );
    }

    #[test]
    fn single_query_term_has_no_separator() {
        let request = Request::new(Region::Na, ApiCategory::Match).query("beginIndex", "0");
        assert_eq!(
            format_url("http", "localhost", &request),
            "http://na1.localhost/lol/match/v3?beginIndex=0"
        );
    }

    #[test]
    fn values_are_not_escaped() {
        let request = Request::new(Region::Na, ApiCategory::Summoner).path("by-name/a b");
        assert!(format_url("https", HOST, &request).ends_with("/by-name/a b"));
    }
}
