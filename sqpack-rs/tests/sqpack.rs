use pretty_assertions::assert_eq;
use sqpack_rs::error::SqPackError;
use sqpack_rs::sqpack_config::SqPackConfig;
use sqpack_rs::sqpack_header::{SqPackHeader, SQPACK_MAGIC};
use sqpack_rs::sqpack_platform::SqPackPlatform;
use sqpack_rs::sqpack_storage::{SqPackStorage, DEFAULT_INDEX, DEFAULT_REPOSITORY};
use std::fs;
use std::path::Path;

fn header_bytes(magic: &[u8; 8], platform: u8, size: u32, version: u32, index_type: u32) -> Vec<u8> {
    let mut bytes = magic.to_vec();
    bytes.push(platform);
    bytes.extend_from_slice(&[0, 0, 0]);
    bytes.extend_from_slice(&size.to_le_bytes());
    bytes.extend_from_slice(&version.to_le_bytes());
    bytes.extend_from_slice(&index_type.to_le_bytes());
    bytes
}

fn game_dir(root: &Path) -> std::path::PathBuf {
    let sqpack = root.join("game").join("sqpack").join(DEFAULT_REPOSITORY);
    fs::create_dir_all(&sqpack).unwrap();
    sqpack
}

#[test]
fn test_config_from_ini() {
    let config =
        SqPackConfig::from_ini_str("[Paths]\nffxiv_path = \"/opt/ffxiv\"\n").unwrap();
    assert_eq!(config.game_path(), Path::new("/opt/ffxiv"));
}

#[test]
fn test_config_missing_key() {
    match SqPackConfig::from_ini_str("[Paths]\nother = 1\n") {
        Err(SqPackError::Config(message)) => {
            assert!(message.contains("ffxiv_path"));
            assert!(message.contains("Paths"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        SqPackConfig::from_ini_str("[Paths]\nffxiv_path = \"\"\n"),
        Err(SqPackError::Config(_))
    ));
}

#[test]
fn test_config_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let ini = dir.path().join("config.ini");
    fs::write(&ini, "[Paths]\nffxiv_path=/games/ffxiv\n").unwrap();

    let config = SqPackConfig::load(&ini).unwrap();
    assert_eq!(config.game_path(), Path::new("/games/ffxiv"));

    assert!(matches!(
        SqPackConfig::load(dir.path().join("absent.ini")),
        Err(SqPackError::FileNotFound(_))
    ));
}

#[test]
fn test_parse_sqpack_header() {
    let root = tempfile::tempdir().unwrap();
    let sqpack = game_dir(root.path());
    fs::write(
        sqpack.join(DEFAULT_INDEX),
        header_bytes(&SQPACK_MAGIC, 0, 0x400, 1, 2),
    )
    .unwrap();

    let config = SqPackConfig::with_game_path(root.path()).unwrap();
    let storage = SqPackStorage::new(&config, DEFAULT_REPOSITORY).unwrap();
    assert_eq!(storage.repository(), DEFAULT_REPOSITORY);

    let header = storage.parse_sqpack().unwrap();
    assert_eq!(
        header,
        SqPackHeader {
            magic: SQPACK_MAGIC,
            platform: SqPackPlatform::Win32,
            padding: [0; 3],
            size: 0x400,
            version: 1,
            index_type: 2,
        }
    );
}

#[test]
fn test_header_with_bad_magic() {
    let root = tempfile::tempdir().unwrap();
    let sqpack = game_dir(root.path());
    fs::write(sqpack.join("0a0000.win32.index"), header_bytes(b"NotSqPak", 1, 0, 0, 0)).unwrap();
    fs::write(sqpack.join("truncated.index"), &SQPACK_MAGIC[..6]).unwrap();

    let config = SqPackConfig::with_game_path(root.path()).unwrap();
    let storage = SqPackStorage::new(&config, DEFAULT_REPOSITORY).unwrap();

    match storage.read_header("0a0000.win32.index") {
        Err(SqPackError::InvalidData(message)) => assert!(message.contains("4e6f74537150616b")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        storage.read_header("truncated.index"),
        Err(SqPackError::UnexpectedEndOfStream { requested: 8, position: 0 })
    ));
    assert!(matches!(
        storage.parse_sqpack(),
        Err(SqPackError::FileNotFound(_))
    ));
}

#[test]
fn test_index_files_are_listed_in_order() {
    let root = tempfile::tempdir().unwrap();
    let sqpack = game_dir(root.path());
    for name in ["0a0000.win32.index2", "000000.win32.index", "0a0000.win32.index", "000000.win32.dat0"] {
        fs::write(sqpack.join(name), b"").unwrap();
    }

    let config = SqPackConfig::with_game_path(root.path()).unwrap();
    let storage = SqPackStorage::new(&config, DEFAULT_REPOSITORY).unwrap();
    let names: Vec<String> = storage
        .index_files()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        vec!["000000.win32.index", "0a0000.win32.index", "0a0000.win32.index2"]
    );
}

#[test]
fn test_missing_repository() {
    let root = tempfile::tempdir().unwrap();
    let config = SqPackConfig::with_game_path(root.path()).unwrap();
    assert!(matches!(
        SqPackStorage::new(&config, "ex1"),
        Err(SqPackError::FileNotFound(_))
    ));
}
