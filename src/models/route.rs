//! Hash-based routing.
//!
//! URL format: `#/dashboard`, `#/files`, ... The hash is the source of truth;
//! [`AppRoute::push`] updates it and the router listens for `hashchange`.

/// Application routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppRoute {
    /// Landing page: `#/` or empty hash
    Home,
    Login,
    Register,
    Dashboard,
    Files,
    Upload,
    Settings,
}

impl AppRoute {
    /// Parse URL hash into a route. Unknown paths land on `Home`.
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_start_matches('/');
        let path = path.split(['?', '/']).next().unwrap_or_default();

        match path {
            "login" => Self::Login,
            "register" => Self::Register,
            "dashboard" => Self::Dashboard,
            "files" => Self::Files,
            "upload" => Self::Upload,
            "settings" => Self::Settings,
            _ => Self::Home,
        }
    }

    /// Convert route to URL hash.
    pub fn to_hash(self) -> &'static str {
        match self {
            Self::Home => "#/",
            Self::Login => "#/login",
            Self::Register => "#/register",
            Self::Dashboard => "#/dashboard",
            Self::Files => "#/files",
            Self::Upload => "#/upload",
            Self::Settings => "#/settings",
        }
    }

    /// Routes that require a well-formed session.
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Files | Self::Upload | Self::Settings
        )
    }

    /// Get current route from browser URL.
    pub fn current() -> Self {
        Self::from_hash(&crate::utils::dom::get_hash())
    }

    /// Navigate to this route (adds a history entry, fires `hashchange`).
    pub fn push(self) {
        crate::utils::dom::set_hash(self.to_hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parsing() {
        assert_eq!(AppRoute::from_hash(""), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#"), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#/"), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_hash("#/dashboard?upload=success"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_hash("#/files/"), AppRoute::Files);
        assert_eq!(AppRoute::from_hash("#/nowhere"), AppRoute::Home);
    }

    #[test]
    fn test_route_round_trip() {
        for route in [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Files,
            AppRoute::Upload,
            AppRoute::Settings,
        ] {
            assert_eq!(AppRoute::from_hash(route.to_hash()), route);
        }
    }

    #[test]
    fn test_protected_routes() {
        assert!(AppRoute::Dashboard.is_protected());
        assert!(AppRoute::Settings.is_protected());
        assert!(!AppRoute::Login.is_protected());
        assert!(!AppRoute::Home.is_protected());
    }
}
