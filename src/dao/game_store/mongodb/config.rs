use std::env;

use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const URI_VAR: &str = "MONGO_URI";
const DATABASE_VAR: &str = "MONGO_DB";
const FALLBACK_DATABASE: &str = "trivia_party";
const APP_NAME: &str = "trivia-party-back";

/// Parsed client options plus the database holding the game collections.
#[derive(Clone)]
pub struct MongoConfig {
    pub options: ClientOptions,
    pub database_name: String,
}

impl MongoConfig {
    /// Parse `uri`. The database is `db_name` when given and not blank, then the URI's
    /// default database, then `trivia_party`.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|source| MongoDaoError::InvalidUri {
                uri: uri.to_owned(),
                source,
            })?;
        if options.app_name.is_none() {
            options.app_name = Some(APP_NAME.to_owned());
        }

        let database_name = db_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| FALLBACK_DATABASE.to_owned());

        Ok(Self {
            options,
            database_name,
        })
    }

    /// Read `MONGO_URI` (required) and `MONGO_DB` (optional).
    pub async fn from_env() -> MongoResult<Self> {
        let uri = env::var(URI_VAR).map_err(|_| MongoDaoError::MissingEnvVar { var: URI_VAR })?;
        let db = env::var(DATABASE_VAR).ok();
        Self::from_uri(&uri, db.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn database_name_precedence() {
        let explicit = MongoConfig::from_uri("mongodb://localhost:27017/quiz", Some("party"))
            .await
            .unwrap();
        assert_eq!(explicit.database_name, "party");
        assert_eq!(explicit.options.app_name.as_deref(), Some(APP_NAME));

        let from_uri = MongoConfig::from_uri("mongodb://localhost:27017/quiz", Some("  "))
            .await
            .unwrap();
        assert_eq!(from_uri.database_name, "quiz");

        let fallback = MongoConfig::from_uri("mongodb://localhost:27017", None)
            .await
            .unwrap();
        assert_eq!(fallback.database_name, FALLBACK_DATABASE);
    }

    #[tokio::test]
    async fn malformed_uri_is_rejected() {
        let err = MongoConfig::from_uri("not-a-uri", None).await.err().unwrap();
        assert!(matches!(err, MongoDaoError::InvalidUri { .. }));
    }
}
