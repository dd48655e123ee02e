//! Route guard: decides what a protected view should do with a session.

use crate::Session;

/// Where unauthenticated visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Where the login form navigates after a successful login.
pub const HOME_ROUTE: &str = "/dashboard";

/// The guard's verdict. The view layer maps each variant onto its own
/// rendering: a spinner, a navigation, or the protected children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// A login or profile request is in flight. Show an indeterminate
    /// "authenticating" state and redirect nowhere.
    Loading,

    /// Navigate to the given route instead of rendering.
    Redirect(&'static str),

    /// Render the protected view.
    Render,
}

/// Evaluates the guard for `session`.
///
/// Checked in order: loading wins over everything; then both token and
/// user must be present.
pub fn evaluate(session: &Session) -> RouteDecision {
    if session.is_loading() {
        RouteDecision::Loading
    } else if !session.is_authenticated() {
        RouteDecision::Redirect(LOGIN_ROUTE)
    } else {
        RouteDecision::Render
    }
}
