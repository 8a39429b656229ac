use directories_next::ProjectDirs;
use once_cell::sync::Lazy;
use std::env;
use std::ops::Deref;
use std::path::Path;
use std::path::PathBuf;
use tracing::warn;

/// Helper that resolves the per-user application directory
#[derive(Clone, Debug)]
pub struct AppHome(pub PathBuf);

impl AppHome {
    /// Returns a `PathBuf` for a filename under the app dir
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    /// Directory holding JSON log files
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.0.join("logs")
    }

    /// Create directories for the app home if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_dir(&self) -> eyre::Result<()> {
        std::fs::create_dir_all(&self.0)?;
        Ok(())
    }

    /// Resolve the `AppHome`:
    /// * If `IMGTOOLS_HOME` env var is set, use that directory
    /// * Otherwise use the platform `ProjectDirs::data_local_dir()` for teamdman/imgtools
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined for the current user.
    pub fn resolve() -> eyre::Result<AppHome> {
        if let Ok(override_dir) = env::var("IMGTOOLS_HOME") {
            return Ok(AppHome(PathBuf::from(override_dir)));
        }
        if let Some(pd) = ProjectDirs::from("", "teamdman", "imgtools") {
            Ok(AppHome(pd.data_local_dir().to_path_buf()))
        } else {
            Err(eyre::eyre!("Could not determine application directory"))
        }
    }
}

impl Deref for AppHome {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.0.as_path()
    }
}

/// Cached `AppHome` instance
pub static APP_HOME: Lazy<AppHome> = Lazy::new(|| match AppHome::resolve() {
    Ok(a) => a,
    Err(e) => {
        warn!("Failed to resolve app home: {}", e);
        AppHome(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
});
