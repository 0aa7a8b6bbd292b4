//! Expiry and display visibility rules.
//!
//! Expiry is a read-time filter: an expired project still exists and the
//! admin read path still returns it, but every read that serves rendered
//! content treats it as not found.

use chrono::{DateTime, Duration, Utc};

use crate::project::{Project, ProjectStatus};
use crate::types::Timestamp;

/// Robots directive for pages that must not be indexed.
pub const ROBOTS_NOINDEX: &str = "noindex, nofollow";
/// Robots directive for regular pages.
pub const ROBOTS_INDEX: &str = "index, follow";

/// `true` once `now` is past `expires_at`. Projects without an expiry never
/// expire.
pub fn is_expired(expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    matches!(expires_at, Some(at) if now > at)
}

/// Expiry timestamp for a project created at `now` in demo mode.
/// Saturates at the latest representable instant instead of overflowing.
pub fn demo_expiry(now: Timestamp, ttl_hours: i64) -> Timestamp {
    Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether the display path may serve this project.
pub fn is_displayable(project: &Project, has_page: bool, now: Timestamp) -> bool {
    project.status == ProjectStatus::Ready && has_page && !is_expired(project.expires_at, now)
}

/// Demo pages (demo mode on, or any page with an expiry) are not indexed.
pub fn robots_directive(demo_mode: bool, expires_at: Option<Timestamp>) -> &'static str {
    if demo_mode || expires_at.is_some() {
        ROBOTS_NOINDEX
    } else {
        ROBOTS_INDEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Locale, Tone};

    fn project(status: ProjectStatus, expires_at: Option<Timestamp>) -> Project {
        let now = Utc::now();
        Project {
            id: 1,
            slug: "acme-bank".into(),
            client_name: "Acme Bank".into(),
            source_url: "https://example-bank.com".into(),
            template_key: "classic".into(),
            tone: Tone::Neutral,
            locale: Locale::Auto,
            status,
            error_message: None,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_expiry_never_expires() {
        assert!(!is_expired(None, Utc::now()));
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        assert!(is_expired(Some(now - Duration::seconds(1)), now));
        assert!(!is_expired(Some(now + Duration::hours(1)), now));
    }

    #[test]
    fn demo_expiry_adds_ttl() {
        let now = Utc::now();
        assert_eq!(demo_expiry(now, 48) - now, Duration::hours(48));
    }

    #[test]
    fn huge_ttl_saturates() {
        let now = Utc::now();
        assert_eq!(demo_expiry(now, i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(demo_expiry(now, i64::MAX / 3_600_000), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn displayable_requires_ready_page_and_unexpired() {
        let now = Utc::now();
        assert!(is_displayable(&project(ProjectStatus::Ready, None), true, now));
        assert!(!is_displayable(&project(ProjectStatus::Ready, None), false, now));
        assert!(!is_displayable(&project(ProjectStatus::Pending, None), true, now));
        assert!(!is_displayable(&project(ProjectStatus::Error, None), true, now));
        assert!(!is_displayable(
            &project(ProjectStatus::Ready, Some(now - Duration::minutes(5))),
            true,
            now
        ));
    }

    #[test]
    fn robots() {
        assert_eq!(robots_directive(false, None), ROBOTS_INDEX);
        assert_eq!(robots_directive(true, None), ROBOTS_NOINDEX);
        assert_eq!(robots_directive(false, Some(Utc::now())), ROBOTS_NOINDEX);
    }
}
