//! Destination form for the database export.

use crate::api::types::{ConflictPolicy, DbEngine, DbTarget};
use secrecy::{ExposeSecret as _, SecretString};

/// Form state behind the export panel.
///
/// Free-text fields stay strings until assembly so the user can type
/// freely; the password never appears in debug output.
pub struct ExportForm {
    pub engine: DbEngine,
    pub sqlite_path: String,
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: SecretString,
    pub database: String,
    pub table_name: String,
    pub if_exists: ConflictPolicy,
}

impl Default for ExportForm {
    fn default() -> Self {
        Self {
            engine: DbEngine::Sqlite,
            sqlite_path: "exported_data.db".to_owned(),
            host: "localhost".to_owned(),
            port: String::new(),
            username: String::new(),
            password: SecretString::default(),
            database: String::new(),
            table_name: "processed_data".to_owned(),
            if_exists: ConflictPolicy::Replace,
        }
    }
}

impl ExportForm {
    /// Called when the user switches engine. Fills in that engine's
    /// suggested port and username. Only a switch runs this, so manual
    /// edits survive everything else the panel does.
    pub fn apply_engine_defaults(&mut self) {
        if let Some(port) = self.engine.default_port() {
            self.port = port.to_string();
        }
        if let Some(user) = self.engine.default_username() {
            self.username = user.to_owned();
        }
    }

    /// Assemble the connection descriptor from the current fields. A
    /// port that does not parse falls back to the engine's suggested one
    /// rather than failing the submission.
    pub fn destination(&self) -> DbTarget {
        if self.engine.is_file_based() {
            return DbTarget::File {
                db_type: self.engine,
                database: self.sqlite_path.trim().to_owned(),
            };
        }
        let fallback = self.engine.default_port().unwrap_or(5432);
        DbTarget::Server {
            db_type: self.engine,
            host: self.host.trim().to_owned(),
            port: self.port.trim().parse::<u16>().unwrap_or(fallback),
            username: self.username.clone(),
            password: self.password.expose_secret().to_owned(),
            database: self.database.trim().to_owned(),
        }
    }
}
