//! Realm error types

use thiserror::Error;

/// Script execution / realm setup error
#[derive(Debug, Error)]
pub enum RealmError {
    #[error("QuickJS error: {0}")]
    QuickJs(String),
}

impl From<rquickjs::Error> for RealmError {
    fn from(err: rquickjs::Error) -> Self {
        Self::QuickJs(err.to_string())
    }
}
