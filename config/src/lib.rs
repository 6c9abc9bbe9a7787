pub mod paths;
pub mod settings;

pub use paths::PathManager;
pub use settings::Settings;

/// Load environment variables from .env files.
/// First loads from ~/.env (home directory), then from ./.env (project directory).
/// Project directory values take precedence over home directory values.
/// Call this before parsing CLI args to ensure env vars are available.
pub fn load_env_file() {
    // Load from home directory first (lower precedence)
    if let Some(home) = dirs::home_dir() {
        let home_env_path = home.join(".env");
        dotenv::from_path(home_env_path).ok();
    }

    // Load from project directory (higher precedence - overwrites home values)
    dotenv::dotenv().ok();
}

/// Resolve the Gemini API key from the environment.
///
/// Checked after `load_env_file`, so `.env` values are visible here.
/// `GEMINI_API_KEY` is preferred; `API_KEY` is accepted as a legacy alias.
/// A missing key is a fatal startup condition for the whole application.
pub fn gemini_api_key() -> anyhow::Result<String> {
    std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "GEMINI_API_KEY environment variable not set. \
                 Provide it in the environment or a .env file before starting."
            )
        })
}
