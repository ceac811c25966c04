/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (field `database_url` reads
/// `DATABASE_URL`) and call `Config::from_env()` once at startup.
///
/// # Panics
///
/// Panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        match envy::from_env() {
            Ok(config) => config,
            Err(e) => panic!("failed to load config from environment: {e}"),
        }
    }

    /// Same as [`Config::from_env`] but reading from an explicit variable list.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
