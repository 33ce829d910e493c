pub(crate) mod ini_file;
