use crate::error::{Result, SqPackError};
use crate::utility::ini_file::IniFile;
use std::path::{Path, PathBuf};

/// Section holding installation paths.
pub const PATHS_SECTION: &str = "Paths";
/// Key naming the game installation root.
pub const GAME_PATH_KEY: &str = "ffxiv_path";

/// Configuration for locating a game installation.
///
/// A `SqPackConfig` is loaded once, validated when it is built and immutable
/// afterwards; it is passed explicitly to [`SqPackStorage`].
///
/// The expected file layout is:
///
/// ```ini
/// [Paths]
/// ffxiv_path = "C:/Program Files (x86)/SquareEnix/FINAL FANTASY XIV - A Realm Reborn"
/// ```
///
/// [`SqPackStorage`]: crate::sqpack_storage::SqPackStorage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqPackConfig {
    game_path: PathBuf,
}

impl SqPackConfig {
    /// Builds a configuration directly from a game installation path.
    pub fn with_game_path<P: Into<PathBuf>>(game_path: P) -> Result<Self> {
        let game_path = game_path.into();
        if game_path.as_os_str().is_empty() {
            return Err(SqPackError::Config(format!(
                "'{GAME_PATH_KEY}' must not be empty"
            )));
        }
        Ok(Self { game_path })
    }

    /// Loads the configuration from an INI file such as `./config.ini`.
    ///
    /// # Arguments
    ///
    /// * `file_name` - The path to the configuration file.
    pub fn load<P: AsRef<Path>>(file_name: P) -> Result<Self> {
        let ini = IniFile::from_file(&file_name)?;
        let config = Self::from_ini(&ini)?;
        tracing::debug!(
            file = %file_name.as_ref().display(),
            game_path = %config.game_path.display(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parses the configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self> {
        let mut ini = IniFile::new();
        ini.load(text.as_bytes())?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &IniFile) -> Result<Self> {
        let value = ini.get(PATHS_SECTION, GAME_PATH_KEY).ok_or_else(|| {
            SqPackError::Config(format!(
                "The key '{GAME_PATH_KEY}' is missing in the '{PATHS_SECTION}' section"
            ))
        })?;
        Self::with_game_path(value.trim_matches('"'))
    }

    /// The root of the game installation.
    pub fn game_path(&self) -> &Path {
        &self.game_path
    }
}
