use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("not signed in: pass --user or set CONVERSO_USER")]
    NotSignedIn,

    #[error("companion {0} not found")]
    CompanionNotFound(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
