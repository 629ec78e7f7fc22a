use shuttle_runtime::SecretStore;

const DEFAULT_DATABASE: &str = "staff_directory";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub mongodb_uri: String,
    pub database_name: String,
}

impl Config {
    /// Reads `MONGODB_URI` (required) and `DATABASE_NAME` from Shuttle secrets.
    pub fn from_secrets(secrets: &SecretStore) -> Option<Self> {
        Self::from_lookup(|key| secrets.get(key))
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        Some(Config {
            mongodb_uri: get("MONGODB_URI")?,
            database_name: get("DATABASE_NAME")
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }
}
