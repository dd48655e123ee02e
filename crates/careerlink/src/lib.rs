//! # Career Link admin
//!
//! Session client for the Career Link admin dashboard.
//!
//! The admin client keeps one piece of shared state: who is signed in. This
//! crate wires the layers that maintain it behind a single [`AdminConsole`]:
//! the identity API over HTTP, a file that keeps the bearer token across
//! restarts, and the session manager that the views subscribe to.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use careerlink::prelude::*;
//!
//! # async fn run() -> Result<(), AdminError> {
//! careerlink::telemetry::init("info");
//!
//! let console = AdminConsole::builder()
//!     .api_base_url("http://localhost:8080/api")
//!     .build()
//!     .await?;
//!
//! match console.settled().await.user {
//!     Some(user) => println!("signed in as {}", user.display_name()),
//!     None => println!("guard says {:?}", console.route_decision()),
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod console;
mod error;
pub mod telemetry;

pub use config::{
    default_storage_path, AdminConfig, API_URL_ENV, DEFAULT_API_URL,
    STORAGE_ENV,
};
pub use console::{AdminConsole, AdminConsoleBuilder};
pub use error::AdminError;

pub use careerlink_protocol as protocol;
pub use careerlink_session as session;
pub use careerlink_transport as transport;

pub mod prelude {
    pub use crate::{AdminConfig, AdminConsole, AdminConsoleBuilder, AdminError};
    pub use careerlink_protocol::{Credentials, Role, UserProfile};
    pub use careerlink_session::{
        evaluate, RouteDecision, Session, SessionConfig, SessionManager,
        TokenStore, HOME_ROUTE, LOGIN_ROUTE,
    };
    pub use careerlink_transport::IdentityApi;
}
