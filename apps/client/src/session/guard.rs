//! Route Guard: presence-only gate in front of protected screens.
//!
//! The guard never inspects the token's contents. A stale token passes, and
//! the first authenticated call inside the screen reports `ClientError::Auth`.

use tracing::debug;

use super::routes::Route;
use super::SessionStore;

#[derive(Debug, PartialEq, Eq)]
pub enum Guarded<V> {
    Rendered(V),
    Redirected(Route),
}

impl<V> Guarded<V> {
    pub fn rendered(self) -> Option<V> {
        match self {
            Guarded::Rendered(v) => Some(v),
            Guarded::Redirected(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Enters `route`. `render` runs only when the route is public or a token is present;
    /// otherwise the navigator is sent to the login screen.
    pub fn enter<V>(&self, route: Route, render: impl FnOnce() -> V) -> Guarded<V> {
        let navigator = self.session.navigator();
        if route.requires_session() && !self.session.is_authenticated() {
            debug!("No session for {route}, redirecting to login");
            navigator.navigate(Route::Login);
            return Guarded::Redirected(Route::Login);
        }
        navigator.navigate(route);
        Guarded::Rendered(render())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::session::routes::Navigator;
    use crate::session::storage::testing::MemoryTokenStorage;

    fn guard_with(token: Option<&str>) -> RouteGuard {
        let storage = match token {
            Some(t) => MemoryTokenStorage::with_token(t),
            None => MemoryTokenStorage::default(),
        };
        let session = SessionStore::open(Arc::new(storage), Navigator::default()).unwrap();
        RouteGuard::new(session)
    }

    #[test]
    fn test_absent_token_never_renders_children() {
        let guard = guard_with(None);
        for route in [Route::Dashboard, Route::Profile, Route::Recommend, Route::Admin] {
            let rendered = Cell::new(false);
            let outcome = guard.enter(route, || rendered.set(true));
            assert_eq!(outcome, Guarded::Redirected(Route::Login));
            assert!(!rendered.get());
            assert_eq!(guard.session.navigator().current(), Route::Login);
        }
    }

    #[test]
    fn test_present_token_always_renders() {
        let guard = guard_with(Some("expired-but-present"));
        let outcome = guard.enter(Route::Profile, || "profile screen");
        assert_eq!(outcome, Guarded::Rendered("profile screen"));
        assert_eq!(guard.session.navigator().current(), Route::Profile);
    }

    #[test]
    fn test_public_routes_render_without_session() {
        let guard = guard_with(None);
        assert_eq!(guard.enter(Route::Register, || 1).rendered(), Some(1));
    }
}
