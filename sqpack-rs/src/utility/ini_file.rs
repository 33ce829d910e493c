use crate::error::SqPackError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A struct to hold an INI file split into sections of `key = value` pairs.
///
/// Section names are case sensitive, keys are not (they are stored
/// lowercased). Lines starting with `#` or `;` are comments.
#[derive(Debug, Default)]
pub(crate) struct IniFile {
    /// The sections within the INI file, keyed by section name
    pub(crate) sections: HashMap<String, HashMap<String, String>>,
}

impl IniFile {
    /// Initializes a new, empty instance
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Initializes a new instance from the given file
    pub(crate) fn from_file<P: AsRef<Path>>(file: P) -> Result<Self, SqPackError> {
        let path = file.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SqPackError::FileNotFound(path.display().to_string()),
            _ => SqPackError::Io(e),
        })?;
        let mut ini = Self::new();
        ini.load(file)?;
        Ok(ini)
    }

    /// Loads INI data from a reader (e.g., File, BufReader, &[u8], etc.)
    pub(crate) fn load<R: Read>(&mut self, reader: R) -> Result<(), SqPackError> {
        let buffered = BufReader::new(reader);
        let mut current: Option<String> = None;

        for (number, line) in buffered.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                self.sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            let Some((key, value)) = line.split_once(|c: char| c == '=' || c == ':') else {
                return Err(SqPackError::Config(format!(
                    "Line {} is neither a section nor a key/value pair",
                    number + 1
                )));
            };
            let Some(section) = current.as_ref() else {
                return Err(SqPackError::Config(format!(
                    "Line {} appears before any section header",
                    number + 1
                )));
            };
            self.sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_lowercase(), value.trim().to_string());
        }
        Ok(())
    }

    /// Gets the value of `key` within `section`, if any
    pub(crate) fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&key.to_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::IniFile;

    #[test]
    fn reads_sections_and_skips_comments() {
        let text = "# game paths\n[Paths]\nFFXIV_Path = \"C:/Games/FFXIV\"\n; trailing\n[Other]\nkey: value\n";
        let mut ini = IniFile::new();
        ini.load(text.as_bytes()).unwrap();

        assert_eq!(ini.get("Paths", "ffxiv_path"), Some("\"C:/Games/FFXIV\""));
        assert_eq!(ini.get("Other", "KEY"), Some("value"));
        assert_eq!(ini.get("paths", "ffxiv_path"), None);
    }

    #[test]
    fn rejects_keys_outside_sections() {
        let mut ini = IniFile::new();
        assert!(ini.load("ffxiv_path = x\n".as_bytes()).is_err());
    }
}
