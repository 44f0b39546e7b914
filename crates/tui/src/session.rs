use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_SESSION_PATH: &str = "config/session.json";

/// Who is signed in. Views receive it explicitly instead of reading any
/// process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
}

impl Session {
    pub fn signed_in(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    /// The bearer token, if one is held and non-blank.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Forgets the token and deletes the persisted file.
    pub fn clear(&mut self, path: &str) -> Result<()> {
        self.token = None;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

pub fn default_session_path() -> &'static str {
    DEFAULT_SESSION_PATH
}
