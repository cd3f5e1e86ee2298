//! Authentication: session tokens and request extractors.

mod extractor;
mod session;

pub use extractor::{AdminAuth, AuthError, SessionAuth};
pub use session::{SESSION_ISSUER, SessionClaims, SessionKeys};
