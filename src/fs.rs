// ABOUTME: The one file-system operation `load` needs: open the named
// ABOUTME: file's parent directory as a capability and read it fully.

use std::path::Path;

use cap_std::ambient_authority;
use cap_std::fs::Dir;

/// Reads `path` fully as raw bytes via `cap-std`'s capability-based
/// directory access (the teacher's `src/sandbox.rs` pattern, trimmed to the
/// single read `load` needs — no allowlist, no write path, no size cap).
/// Returns bytes rather than a `String` so the caller can decode through
/// `parser::decode_utf8` and get a positioned `Invalid UTF-8 sequence.`
/// error (spec.md §4.3/§7) instead of a generic io error on bad input.
pub fn read(path: &str) -> std::io::Result<Vec<u8>> {
    let path = Path::new(path);
    let dir_path = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "missing file name")
    })?;

    let dir = Dir::open_ambient_dir(dir_path, ambient_authority())?;
    dir.read(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_an_existing_file() {
        let mut tmp = std::env::temp_dir();
        tmp.push(format!("bali-fs-test-{}.txt", std::process::id()));
        {
            let mut f = std::fs::File::create(&tmp).unwrap();
            writeln!(f, "(+ 1 2)").unwrap();
        }
        let contents = read(tmp.to_str().unwrap()).unwrap();
        assert_eq!(String::from_utf8(contents).unwrap().trim(), "(+ 1 2)");
        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read("/no/such/path/at/all.bali").is_err());
    }
}
