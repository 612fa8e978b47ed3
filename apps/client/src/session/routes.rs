use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

/// Every screen the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Profile,
    Recommend,
    Admin,
    NotFound,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::Recommend => "/recommend",
            Route::Admin => "/admin",
            Route::NotFound => "/404",
        }
    }

    /// Unknown paths resolve to `NotFound`; query strings and trailing slashes are ignored.
    #[allow(dead_code)]
    pub fn from_path(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        match path {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/dashboard" => Route::Dashboard,
            "/profile" => Route::Profile,
            "/recommend" => Route::Recommend,
            "/admin" => Route::Admin,
            _ => Route::NotFound,
        }
    }

    pub fn requires_session(self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Profile | Route::Recommend | Route::Admin
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Tracks the current route. Cloning shares the same location.
#[derive(Clone)]
pub struct Navigator {
    current: Arc<Mutex<Route>>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn navigate(&self, to: Route) {
        let mut current = self.current.lock();
        if *current != to {
            info!("Navigating {} -> {}", *current, to);
        }
        *current = to;
    }

    pub fn current(&self) -> Route {
        *self.current.lock()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::Dashboard,
            Route::Profile,
            Route::Recommend,
            Route::Admin,
        ] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(Route::from_path("/settings"), Route::NotFound);
        assert_eq!(Route::from_path("/login?registered=true"), Route::Login);
        assert_eq!(Route::from_path("/profile/"), Route::Profile);
    }

    #[test]
    fn test_protected_routes() {
        assert!(Route::Dashboard.requires_session());
        assert!(Route::Admin.requires_session());
        assert!(!Route::Login.requires_session());
        assert!(!Route::Landing.requires_session());
    }

    #[test]
    fn test_clones_share_location() {
        let nav = Navigator::default();
        let other = nav.clone();
        other.navigate(Route::Profile);
        assert_eq!(nav.current(), Route::Profile);
    }
}
