//! Locating and loading the depfile.
//!
//! Candidates are tried in order and the first existing file wins:
//! the `--config` path, `depfile.toml` then `.depfile.toml` in the project
//! directory, then `config.toml` in the user's dtrac directory
//! (`$DTRAC_CONFIG_DIR`, else `~/.dtrac`).

use anyhow::{bail, Context, Result};
use dtrac_core::Depfile;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a depfile was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepfileOrigin {
    /// Passed with `--config` or `DTRAC_DEPFILE`.
    Flag,
    /// Sitting in the project directory.
    Project,
    /// Shared by every project of the current user.
    UserDefault,
}

impl fmt::Display for DepfileOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "explicit",
            Self::Project => "project",
            Self::UserDefault => "user-wide",
        })
    }
}

/// A parsed depfile and where it came from.
#[derive(Debug)]
pub struct LoadedDepfile {
    /// The parsed depfile.
    pub depfile: Depfile,
    /// File the depfile was read from.
    pub path: PathBuf,
    /// How [`Self::path`] was chosen.
    pub origin: DepfileOrigin,
}

impl LoadedDepfile {
    /// Directory relative depfile entries resolve against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The class map to analyze: `override_path` if given, otherwise
    /// `[analyzer] class_map` relative to [`Self::base_dir`].
    #[must_use]
    pub fn class_map_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path.map_or_else(
            || self.depfile.class_map_path(self.base_dir()),
            Path::to_path_buf,
        )
    }
}

/// Finds the depfile for a project.
#[derive(Debug, Clone, Default)]
pub struct DepfileLocator {
    user_dir: Option<PathBuf>,
}

impl DepfileLocator {
    /// Uses `$DTRAC_CONFIG_DIR`, else `~/.dtrac`, as the user directory.
    #[must_use]
    pub fn from_env() -> Self {
        let user_dir = std::env::var_os("DTRAC_CONFIG_DIR")
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|h| h.join(".dtrac")));
        Self::with_user_dir(user_dir)
    }

    /// Uses `dir` as the user directory; `None` disables the fallback.
    #[must_use]
    pub fn with_user_dir(dir: Option<PathBuf>) -> Self {
        Self { user_dir: dir }
    }

    fn candidates(&self, project_dir: &Path) -> Vec<(DepfileOrigin, PathBuf)> {
        let mut candidates = vec![
            (DepfileOrigin::Project, project_dir.join("depfile.toml")),
            (DepfileOrigin::Project, project_dir.join(".depfile.toml")),
        ];
        if let Some(dir) = &self.user_dir {
            candidates.push((DepfileOrigin::UserDefault, dir.join("config.toml")));
        }
        candidates
    }

    /// Picks the depfile to use, without reading it.
    ///
    /// An explicit path is returned as-is, even if it does not exist, so
    /// that loading reports it.
    #[must_use]
    pub fn locate(
        &self,
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> Option<(DepfileOrigin, PathBuf)> {
        if let Some(path) = explicit {
            return Some((DepfileOrigin::Flag, path.to_path_buf()));
        }
        self.candidates(project_dir)
            .into_iter()
            .find(|(_, path)| path.is_file())
    }

    /// Locates and parses the depfile.
    ///
    /// # Errors
    ///
    /// Returns error if no depfile is found or it cannot be parsed.
    pub fn load(&self, project_dir: &Path, explicit: Option<&Path>) -> Result<LoadedDepfile> {
        let Some((origin, path)) = self.locate(project_dir, explicit) else {
            bail!("depfile.toml not found, run `dtrac init` to create one.");
        };
        tracing::info!("Using {origin} depfile {}", path.display());

        let depfile = Depfile::from_file(&path)
            .with_context(|| format!("Failed to load depfile: {}", path.display()))?;

        Ok(LoadedDepfile {
            depfile,
            path,
            origin,
        })
    }
}

/// Loads the depfile for `project_dir` with the environment's user directory.
///
/// # Errors
///
/// See [`DepfileLocator::load`].
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<LoadedDepfile> {
    DepfileLocator::from_env().load(project_dir, explicit)
}
