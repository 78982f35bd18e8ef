//! Cookie store capability used by the request builder.

use std::fmt;

/// A cookie jar the builder empties before every request.
pub trait CookieStore: fmt::Debug + Send + Sync {
    /// Remove every stored cookie.
    fn clear(&self);
}

/// Store for transports that never persist cookies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCookieStore;

impl CookieStore for NoCookieStore {
    fn clear(&self) {}
}
