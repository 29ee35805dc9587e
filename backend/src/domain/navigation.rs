//! Client route guards.
//!
//! Resolves a requested path against the signed-in player and decides which
//! view to show and whether the client must be redirected. Locked problem
//! routes redirect straight to the highest unlocked problem.

use serde::{Deserialize, Serialize};

use super::{Player, ProblemCatalogue, ProblemId, Tier};

/// Known client routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/login`
    Login,
    /// `/leaderboard`
    Leaderboard,
    /// `/problem1`, `/problem2`, `/problem3`
    Problem(Tier),
    /// Anything else.
    NotFound,
}

impl Route {
    /// Parse a request path, ignoring any query string, fragment or trailing
    /// slash.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::{Route, Tier};
    ///
    /// assert_eq!(Route::parse("/problem2"), Route::Problem(Tier::Medium));
    /// assert_eq!(Route::parse("/login?next=/"), Route::Login);
    /// assert_eq!(Route::parse("/problem4"), Route::NotFound);
    /// ```
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        match path {
            "/" | "" => Self::Home,
            "/login" => Self::Login,
            "/leaderboard" => Self::Leaderboard,
            other => other
                .strip_prefix("/problem")
                .filter(|slot| slot.len() == 1)
                .and_then(|slot| slot.parse::<u8>().ok())
                .and_then(Tier::from_slot)
                .map_or(Self::NotFound, Self::Problem),
        }
    }

    /// Canonical path for this route.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Leaderboard => "/leaderboard",
            Self::Problem(tier) => problem_path(tier),
            Self::NotFound => "/404",
        }
    }
}

/// Route path for the problem in `tier`.
pub const fn problem_path(tier: Tier) -> &'static str {
    match tier {
        Tier::Easy => "/problem1",
        Tier::Medium => "/problem2",
        Tier::Hard => "/problem3",
    }
}

/// View the client should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "problem", rename_all = "camelCase")]
pub enum View {
    /// Sign-in form.
    Login,
    /// Problem list.
    Home,
    /// Code editor for a problem.
    Editor(ProblemId),
    /// Ranked standings.
    Leaderboard,
    /// Unknown route.
    NotFound,
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// View to render after any redirect.
    pub view: View,
    /// Path the client must replace its location with, if any.
    pub redirect: Option<&'static str>,
}

impl Navigation {
    const fn stay(view: View) -> Self {
        Self {
            view,
            redirect: None,
        }
    }

    const fn redirect(view: View, to: &'static str) -> Self {
        Self {
            view,
            redirect: Some(to),
        }
    }
}

/// Resolve `path` for an optional signed-in `player`.
///
/// - Unauthenticated visitors are redirected to `/login` from every route.
/// - Authenticated visitors on `/login` are redirected to `/`.
/// - A locked problem route redirects to the highest unlocked problem.
///
/// # Examples
/// ```
/// use coderush::domain::{resolve, Player, ProblemCatalogue, UserId, View};
///
/// let catalogue = ProblemCatalogue::default();
/// let player = Player::new(UserId::random(), "ada");
/// let nav = resolve("/problem3", Some(&player), &catalogue);
/// assert_eq!(nav.redirect, Some("/problem1"));
/// assert!(matches!(nav.view, View::Editor(_)));
/// ```
pub fn resolve(path: &str, player: Option<&Player>, catalogue: &ProblemCatalogue) -> Navigation {
    let route = Route::parse(path);
    let Some(player) = player else {
        return match route {
            Route::Login => Navigation::stay(View::Login),
            _ => Navigation::redirect(View::Login, Route::Login.path()),
        };
    };

    match route {
        Route::Login => Navigation::redirect(View::Home, Route::Home.path()),
        Route::Home => Navigation::stay(View::Home),
        Route::Leaderboard => Navigation::stay(View::Leaderboard),
        Route::NotFound => Navigation::stay(View::NotFound),
        Route::Problem(tier) => {
            if player.solved.is_unlocked(tier) {
                Navigation::stay(View::Editor(catalogue.by_tier(tier).id.clone()))
            } else {
                let open = player.solved.highest_unlocked();
                Navigation::redirect(
                    View::Editor(catalogue.by_tier(open).id.clone()),
                    problem_path(open),
                )
            }
        }
    }
}
