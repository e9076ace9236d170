//! # compass-session
//!
//! Session acquisition and authenticated request replay for the Compass
//! portal.
//!
//! - [`Session`]: the state machine. Configure a base URL, log in (or restore
//!   cookies from an earlier login), then issue [`Session::request`] calls.
//! - [`LoginDriver`]: the login surface. [`FormLoginDriver`] posts the
//!   portal's login form over HTTP.
//! - [`CookieJar`]: the cookies replayed on every request.
//!
//! ```no_run
//! use compass_session::{Credentials, Method, Session, SessionOptions};
//!
//! # async fn run() -> compass_core::Result<()> {
//! let mut session = Session::with_base_url("school.compass.education", SessionOptions::default())?;
//! session.login(&Credentials::new("jdoe", "hunter2")).await?;
//! let staff = session
//!     .request("/Services/User.svc/GetAllStaff?sessionstate=readonly", Method::POST, None)
//!     .await?;
//! println!("{staff}");
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

mod cookies;
mod driver;
pub mod extract;
mod form_login;
mod http;
mod session;
mod url;

pub use cookies::{Cookie, CookieJar, SetCookie};
pub use driver::{Credentials, LoginDriver, LoginOutcome};
pub use form_login::{FormFields, FormLoginDriver};
pub use session::{Session, SessionOptions, SessionState};
pub use url::normalize_base_url;

pub use reqwest::{Method, Url};
