//! File I/O utilities shared by the commands.
//!
//! - Reading a line of interactive input
//! - Reading round history files, stripping a UTF-8 BOM
//! - Collecting `.jsonl` files under a directory
//! - Ensuring parent directories exist before writes

use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Reads one trimmed line. `None` on EOF or read error.
///
/// ```rust
/// use std::io::Cursor;
/// # use ronda_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("  305 \n");
/// assert_eq!(read_stdin_line(&mut input).as_deref(), Some("305"));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Reads a text file as UTF-8, dropping a leading BOM.
pub fn read_text(path: &Path) -> Result<String, String> {
    let mut content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// The `.jsonl` files to read for `input`: the file itself, or every
/// `.jsonl` file below a directory in sorted order.
pub fn collect_jsonl_files(input: &Path) -> Vec<PathBuf> {
    if !input.is_dir() {
        return vec![input.to_path_buf()];
    }
    let mut files = Vec::new();
    let mut stack = vec![input.to_path_buf()];
    while let Some(d) = stack.pop() {
        let Ok(rd) = std::fs::read_dir(&d) else {
            continue;
        };
        for e in rd.filter_map(Result::ok) {
            let p = e.path();
            if p.is_dir() {
                stack.push(p);
            } else if p.extension().is_some_and(|ext| ext == "jsonl") {
                files.push(p);
            }
        }
    }
    files.sort();
    files
}

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_stdin_line_with_whitespace() {
        let mut cursor = Cursor::new(b"  5B  \n");
        assert_eq!(read_stdin_line(&mut cursor), Some("5B".to_string()));
    }

    #[test]
    fn test_read_stdin_line_empty_after_trim() {
        let mut cursor = Cursor::new(b"   \n");
        assert_eq!(read_stdin_line(&mut cursor), Some("".to_string()));
    }

    #[test]
    fn test_read_stdin_line_eof() {
        let mut cursor = Cursor::new(b"");
        assert_eq!(read_stdin_line(&mut cursor), None);
    }

    #[test]
    fn test_strip_utf8_bom() {
        let mut s = "\u{feff}{}".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "{}");
    }

    #[test]
    fn test_read_text_missing_file() {
        assert!(read_text(Path::new("/nonexistent/rounds.jsonl")).is_err());
    }

    #[test]
    fn test_collect_jsonl_files_walks_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("one.jsonl"), "").unwrap();
        std::fs::write(nested.join("two.jsonl"), "").unwrap();
        std::fs::write(nested.join("notes.txt"), "").unwrap();

        let files = collect_jsonl_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().unwrap() == "jsonl"));
    }

    #[test]
    fn test_collect_jsonl_files_single_file() {
        let path = Path::new("rounds.jsonl");
        assert_eq!(collect_jsonl_files(path), vec![path.to_path_buf()]);
    }

    #[test]
    fn test_ensure_parent_dir_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("subdir").join("file.jsonl");
        assert!(ensure_parent_dir(&nested_path).is_ok());
        assert!(temp_dir.path().join("subdir").exists());
    }
}
