use std::str::FromStr;

use crate::session::context::SessionContext;

/// Named application routes. Everything past the home/login page sits
/// behind the authenticated-session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    ProfileSetup,
    Dashboard,
    AppCatalog,
    ContentCreation,
}

impl AppRoute {
    pub const ALL: [AppRoute; 5] = [
        AppRoute::Home,
        AppRoute::ProfileSetup,
        AppRoute::Dashboard,
        AppRoute::AppCatalog,
        AppRoute::ContentCreation,
    ];

    pub fn path(self) -> &'static str {
        match self {
            AppRoute::Home => "/",
            AppRoute::ProfileSetup => "/profile-setup",
            AppRoute::Dashboard => "/dashboard",
            AppRoute::AppCatalog => "/apps",
            AppRoute::ContentCreation => "/create",
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, AppRoute::Home)
    }
}

impl FromStr for AppRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppRoute::ALL
            .into_iter()
            .find(|r| r.path() == s)
            .ok_or_else(|| format!("unknown route: {s}"))
    }
}

/// Whether the current session may navigate to the route.
pub async fn can_navigate(route: AppRoute, session: &SessionContext) -> bool {
    !route.requires_auth() || session.is_authenticated().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::seed::SeedData;
    use crate::storage::MemoryStore;
    use crate::users::services::CredentialService;

    fn session() -> SessionContext {
        let store = Arc::new(MemoryStore::new());
        let seed = Arc::new(SeedData::default());
        let users = CredentialService::new(store.clone(), seed.clone());
        SessionContext::new(store, users, seed, Duration::ZERO)
    }

    #[tokio::test]
    async fn unauthenticated_session_only_reaches_home() {
        let ctx = session();
        for route in AppRoute::ALL {
            assert_eq!(can_navigate(route, &ctx).await, route == AppRoute::Home);
        }
    }

    #[tokio::test]
    async fn authenticated_session_reaches_everything() {
        let ctx = session();
        ctx.login("demo", "demo123").await.unwrap();
        for route in AppRoute::ALL {
            assert!(can_navigate(route, &ctx).await);
        }
    }

    #[test]
    fn routes_parse_from_their_paths() {
        assert_eq!("/dashboard".parse::<AppRoute>().unwrap(), AppRoute::Dashboard);
        assert_eq!("/".parse::<AppRoute>().unwrap(), AppRoute::Home);
        assert!("/nowhere".parse::<AppRoute>().is_err());
    }
}
