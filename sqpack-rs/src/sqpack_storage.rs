use crate::{
    binary_reader::BinaryReader, endianness::Endianness, error::SqPackError,
    sqpack_config::SqPackConfig, sqpack_header::SqPackHeader,
};
use glob::{glob, Pattern};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// Repository holding the base game archives.
pub const DEFAULT_REPOSITORY: &str = "ffxiv";
/// Index file of the first category in the base repository.
pub const DEFAULT_INDEX: &str = "000000.win32.index";

/// Extensions of the index files that describe archive contents.
const INDEX_EXTENSIONS: [&str; 2] = ["index", "index2"];

/// Represents one SqPack repository inside a game installation.
///
/// A repository is the directory `<game>/game/sqpack/<repository>/` holding
/// `.index`, `.index2` and `.datN` files.
///
/// ```rust,no_run
/// use sqpack_rs::sqpack_config::SqPackConfig;
/// use sqpack_rs::sqpack_storage::{SqPackStorage, DEFAULT_REPOSITORY};
///
/// let config = SqPackConfig::load("./config.ini").unwrap();
/// let storage = SqPackStorage::new(&config, DEFAULT_REPOSITORY).unwrap();
///
/// for index in storage.index_files().unwrap() {
///     println!("{}", index.display());
/// }
/// let header = storage.parse_sqpack().unwrap();
/// println!("{} {} {}", header.size, header.version, header.index_type);
/// ```
#[derive(Debug, Clone)]
pub struct SqPackStorage {
    /// Name of the repository directory.
    repository: String,
    /// Path to the repository directory.
    sqpack_path: PathBuf,
}

impl SqPackStorage {
    /// Resolves `repository` under the configured game installation.
    pub fn new(config: &SqPackConfig, repository: &str) -> Result<Self, SqPackError> {
        let sqpack_path = config
            .game_path()
            .join("game")
            .join("sqpack")
            .join(repository);

        if !sqpack_path.is_dir() {
            return Err(SqPackError::FileNotFound(format!(
                "Failed to locate SqPack repository {}",
                sqpack_path.display()
            )));
        }
        tracing::debug!(path = %sqpack_path.display(), "opened SqPack repository");

        Ok(SqPackStorage {
            repository: repository.to_string(),
            sqpack_path,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn sqpack_path(&self) -> &Path {
        &self.sqpack_path
    }

    /// Lists the index files of the repository, sorted by name.
    pub fn index_files(&self) -> Result<Vec<PathBuf>, SqPackError> {
        let dir = Pattern::escape(&self.sqpack_path.display().to_string());
        let mut files = Vec::new();

        for extension in INDEX_EXTENSIONS {
            let pattern = format!("{dir}/*.{extension}");
            let paths = glob(&pattern)
                .map_err(|e| SqPackError::InvalidData(format!("Bad index pattern: {e}")))?;
            for entry in paths {
                let path = entry.map_err(|e| SqPackError::InvalidData(e.to_string()))?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }

        files.sort();
        tracing::debug!(count = files.len(), "discovered index files");
        Ok(files)
    }

    /// Opens a little-endian reader over the named index file.
    pub fn open_index(&self, name: &str) -> Result<BinaryReader<BufReader<File>>, SqPackError> {
        BinaryReader::open(self.sqpack_path.join(name), Endianness::Little)
    }

    /// Reads and validates the header of the named index file.
    pub fn read_header(&self, name: &str) -> Result<SqPackHeader, SqPackError> {
        let mut index = self.open_index(name)?;
        let header = index.read_struct::<SqPackHeader>()?;
        index.close();

        header.validate()?;
        tracing::debug!(
            index = name,
            platform = %header.platform,
            size = header.size,
            version = header.version,
            index_type = header.index_type,
            "read SqPack header"
        );
        Ok(header)
    }

    /// Reads the header of the repository's first index file.
    pub fn parse_sqpack(&self) -> Result<SqPackHeader, SqPackError> {
        self.read_header(DEFAULT_INDEX)
    }
}
