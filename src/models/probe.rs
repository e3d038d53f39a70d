use std::fs;
use std::path::Path;

/// Recursive directory size in bytes. Absent paths contribute zero and
/// unreadable entries are skipped; probing is best-effort, never an error.
pub(crate) fn dir_size(path: &Path) -> u64 {
    if path.is_file() {
        return fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    }
    let mut size = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            size += dir_size(&entry.path());
        }
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn sums_nested_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sub = dir.path().join("weights");
        fs::create_dir_all(&sub).expect("mkdir");

        File::create(dir.path().join("config.json"))
            .and_then(|mut file| file.write_all(&[0u8; 16]))
            .expect("write config");
        File::create(sub.join("weight.bin"))
            .and_then(|mut file| file.write_all(&[0u8; 48]))
            .expect("write weights");

        assert_eq!(dir_size(dir.path()), 64);
    }

    #[test]
    fn missing_path_is_zero() {
        assert_eq!(dir_size(Path::new("/definitely/not/here")), 0);
    }

    #[test]
    fn single_file_reports_its_length() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.mil");
        File::create(&path)
            .and_then(|mut file| file.write_all(&[0u8; 7]))
            .expect("write file");
        assert_eq!(dir_size(&path), 7);
    }
}
