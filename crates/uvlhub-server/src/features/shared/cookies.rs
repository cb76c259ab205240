//! Analytics cookies
//!
//! Download and view events are deduplicated per browser using opaque random
//! cookies. These identify a browser, never a user, and play no role in
//! authentication.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use cookie::time::Duration;
use uuid::Uuid;

/// Cookie deduplicating dataset download records.
pub const DOWNLOAD_COOKIE: &str = "download_cookie";

/// Cookie deduplicating dataset and hubfile view records.
pub const VIEW_COOKIE: &str = "view_cookie";

/// Cookie deduplicating hubfile download records.
pub const FILE_DOWNLOAD_COOKIE: &str = "file_download_cookie";

/// Analytics cookies live for two years.
const COOKIE_MAX_AGE: Duration = Duration::days(2 * 365);

/// Return the value of the named cookie, minting a fresh UUID and adding it
/// to the jar when the browser sent none.
pub fn ensure_cookie(jar: CookieJar, name: &'static str) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(name) {
        let value = cookie.value().to_string();
        return (jar, value);
    }

    let value = Uuid::new_v4().to_string();
    let cookie = Cookie::build((name, value.clone()))
        .path("/")
        .max_age(COOKIE_MAX_AGE)
        .build();
    (jar.add(cookie), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_cookie_is_reused() {
        let jar = CookieJar::new().add(Cookie::new(DOWNLOAD_COOKIE, "abc-123"));
        let (_jar, value) = ensure_cookie(jar, DOWNLOAD_COOKIE);
        assert_eq!(value, "abc-123");
    }

    #[test]
    fn test_missing_cookie_is_minted() {
        let (jar, value) = ensure_cookie(CookieJar::new(), VIEW_COOKIE);
        assert_eq!(value.len(), 36);
        assert_eq!(jar.get(VIEW_COOKIE).map(|c| c.value().to_string()), Some(value));
    }

    #[test]
    fn test_minted_cookie_lives_two_years() {
        let (jar, _value) = ensure_cookie(CookieJar::new(), FILE_DOWNLOAD_COOKIE);
        let cookie = jar.get(FILE_DOWNLOAD_COOKIE).unwrap();
        assert_eq!(cookie.max_age(), Some(Duration::days(730)));
        assert_eq!(cookie.path(), Some("/"));
    }
}
