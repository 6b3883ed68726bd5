//! Client-side routes and the fade between pages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Home,
    About,
    Experience,
    NotFound,
}

impl Route {
    /// Routes shown in the navigation bar, in order.
    pub const NAV: [Route; 3] = [Route::Home, Route::About, Route::Experience];

    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/about" => Self::About,
            "/experience" | "/test" => Self::Experience,
            _ => Self::NotFound,
        }
    }

    /// Canonical path. `NotFound` has none of its own.
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Experience => "/experience",
            Self::NotFound => "/404",
        }
    }

    /// Translation key of the route's label.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Experience => "experience",
            Self::NotFound => "not_found",
        }
    }
}

/// Page change in flight: the old page fades out during the first half,
/// the new page fades in during the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTransition {
    pub from: Route,
    pub to: Route,
    pub started: Duration,
    /// Length of each half.
    pub half: Duration,
}

impl PageTransition {
    fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.elapsed(now) >= self.half * 2
    }

    /// Page to draw at `now`.
    pub fn visible(&self, now: Duration) -> Route {
        if self.elapsed(now) < self.half { self.from } else { self.to }
    }

    /// Opacity of the outgoing page, 1 → 0 over the first half.
    pub fn exit_opacity(&self, now: Duration) -> f32 {
        1.0 - self.progress(self.elapsed(now))
    }

    /// Opacity of the incoming page, 0 → 1 over the second half.
    pub fn enter_opacity(&self, now: Duration) -> f32 {
        self.progress(self.elapsed(now).saturating_sub(self.half))
    }

    /// Opacity of whichever page is visible.
    pub fn opacity(&self, now: Duration) -> f32 {
        if self.elapsed(now) < self.half {
            self.exit_opacity(now)
        } else {
            self.enter_opacity(now)
        }
    }

    fn progress(&self, t: Duration) -> f32 {
        if self.half.is_zero() {
            return 1.0;
        }
        (t.as_secs_f32() / self.half.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    transition: Option<PageTransition>,
    half: Duration,
}

impl Router {
    /// `transition_ms` is the full fade, split evenly between exit and
    /// enter.
    pub fn new(initial: Route, transition_ms: u64) -> Self {
        Self {
            current: initial,
            transition: None,
            half: Duration::from_millis(transition_ms / 2),
        }
    }

    /// Route the user asked for last.
    pub fn current(&self) -> Route {
        self.current
    }

    pub fn transition(&self) -> Option<&PageTransition> {
        self.transition.as_ref()
    }

    /// Start moving to `route`. Returns `false` when already there.
    pub fn navigate(&mut self, route: Route, now: Duration) -> bool {
        if route == self.current {
            return false;
        }
        let from = match self.transition {
            Some(t) if !t.is_finished(now) => t.visible(now),
            _ => self.current,
        };
        tracing::info!(from = from.path(), to = route.path(), "navigate");
        self.transition = Some(PageTransition {
            from,
            to: route,
            started: now,
            half: self.half,
        });
        self.current = route;
        true
    }

    pub fn navigate_path(&mut self, path: &str, now: Duration) -> bool {
        self.navigate(Route::from_path(path), now)
    }

    /// Drop a finished transition. Returns `true` while one is still
    /// running so the caller keeps repainting.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.transition {
            Some(t) if t.is_finished(now) => {
                self.transition = None;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Page to draw and its opacity.
    pub fn frame(&self, now: Duration) -> (Route, f32) {
        match &self.transition {
            Some(t) if !t.is_finished(now) => (t.visible(now), t.opacity(now)),
            _ => (self.current, 1.0),
        }
    }
}
