use serde::Serialize;

use crate::identity::Identity;

pub const APP_TITLE: &str = "Converso";
pub const APP_DESCRIPTION: &str = "Real-time AI Teaching Platform";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Companion,
    MyJourney,
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Home,
        Route::Companion,
        Route::MyJourney,
        Route::Dashboard,
    ];

    pub fn href(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Companion => "/companion",
            Route::MyJourney => "/my-journey",
            Route::Dashboard => "/dashboard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Companion => "Companion",
            Route::MyJourney => "My Journey",
            Route::Dashboard => "Dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.href() == path)
    }

    /// Only shown to signed-in users.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub route: Route,
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Links for the nav bar, in display order.
///
/// `pathname` must match an href exactly to be highlighted; there is no
/// prefix matching, so `/companion/42` highlights nothing.
pub fn nav_items(pathname: &str, identity: &Identity) -> Vec<NavLink> {
    Route::ALL
        .into_iter()
        .filter(|route| !route.requires_sign_in() || identity.is_signed_in())
        .map(|route| NavLink {
            route,
            label: route.label(),
            href: route.href(),
            active: pathname == route.href(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(links: &[NavLink]) -> Vec<&'static str> {
        links.iter().map(|l| l.label).collect()
    }

    #[test]
    fn dashboard_hidden_when_signed_out() {
        let links = nav_items("/", &Identity::signed_out());
        assert_eq!(labels(&links), vec!["Home", "Companion", "My Journey"]);
    }

    #[test]
    fn dashboard_shown_when_signed_in() {
        let links = nav_items("/", &Identity::signed_in("user_1"));
        assert_eq!(
            labels(&links),
            vec!["Home", "Companion", "My Journey", "Dashboard"]
        );
    }

    #[test]
    fn active_link_matches_pathname() {
        let links = nav_items("/my-journey", &Identity::signed_in("user_1"));
        let active: Vec<_> = links.iter().filter(|l| l.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].route, Route::MyJourney);
    }

    #[test]
    fn dashboard_path_while_signed_out_highlights_nothing() {
        let links = nav_items("/dashboard", &Identity::signed_out());
        assert!(links.iter().all(|l| !l.active));
    }

    #[test]
    fn nested_path_is_not_active() {
        let links = nav_items("/companion/42", &Identity::signed_in("u"));
        assert!(links.iter().all(|l| !l.active));
    }

    #[test]
    fn route_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path("/dashboard"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/nope"), None);
    }
}
