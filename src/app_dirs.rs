use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "typebetter")
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typebetter_config.json"))
    }

    /// Where the API token is looked up when no path is configured
    pub fn token_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("token.txt"))
            .unwrap_or_else(|| PathBuf::from("token.txt"))
    }
}
