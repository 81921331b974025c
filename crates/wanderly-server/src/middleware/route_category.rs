//! Route categorization for request logging.

use axum::http::Uri;

/// Route classification for grouping request logs by functional area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteCategory {
    /// Login, registration, logout and password routes.
    Authentication,
    /// Server actions (`/actions/*`).
    Actions,
    /// Public tour pages (`/tours*`).
    Pages,
    /// Role dashboards (`/dashboard/*`).
    Dashboards,
    /// Health routes (`/health`).
    Monitors,
    /// Unknown or uncategorized routes.
    Unknown,
}

impl RouteCategory {
    /// Categorizes a route based on its URI path.
    pub fn from_uri(uri: &Uri) -> Self {
        let path = uri.path();

        if path.starts_with("/actions/auth/") || path == "/logout" {
            Self::Authentication
        } else if path.starts_with("/actions/") {
            Self::Actions
        } else if path == "/tours" || path.starts_with("/tours/") {
            Self::Pages
        } else if path.starts_with("/dashboard/") {
            Self::Dashboards
        } else if path == "/health" {
            Self::Monitors
        } else {
            Self::Unknown
        }
    }

    /// Returns the string representation for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "auth",
            Self::Actions => "actions",
            Self::Pages => "pages",
            Self::Dashboards => "dashboards",
            Self::Monitors => "monitors",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_paths() {
        let cases = [
            ("/actions/auth/login", RouteCategory::Authentication),
            ("/logout", RouteCategory::Authentication),
            ("/actions/bookings/mine", RouteCategory::Actions),
            ("/tours", RouteCategory::Pages),
            ("/tours/sajek-valley", RouteCategory::Pages),
            ("/tourism", RouteCategory::Unknown),
            ("/dashboard/host", RouteCategory::Dashboards),
            ("/health", RouteCategory::Monitors),
        ];

        for (path, expected) in cases {
            let uri: Uri = path.parse().unwrap();
            assert_eq!(RouteCategory::from_uri(&uri), expected, "{path}");
        }
    }
}
