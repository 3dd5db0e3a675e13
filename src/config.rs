use std::path::PathBuf;

use crate::identity::Identity;

pub const DEFAULT_DB_NAME: &str = "converso.db";
pub const DB_ENV: &str = "CONVERSO_DB";
pub const USER_ENV: &str = "CONVERSO_USER";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub identity: Identity,
}

impl Config {
    /// `user_flag` wins over `CONVERSO_USER`.
    pub fn load(user_flag: Option<String>) -> Self {
        let user = user_flag.or_else(|| std::env::var(USER_ENV).ok());
        Self {
            db_path: get_db_path(),
            identity: user.map(Identity::signed_in).unwrap_or_default(),
        }
    }
}

pub fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_ENV) {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("converso");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}
