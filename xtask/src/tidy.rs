use std::{
    fs,
    path::{Path, PathBuf},
};

use xshell::{cmd, Shell};

#[test]
fn test_formatting() {
    let sh = Shell::new().unwrap();
    cmd!(sh, "cargo fmt -- --check").run().unwrap()
}

#[test]
fn sources_stay_tidy() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap();
    let mut files = Vec::new();
    for dir in ["src", "tests", "demos"] {
        rust_files(&root.join(dir), &mut files);
    }
    assert!(!files.is_empty());
    for file in files {
        let text = fs::read_to_string(&file).unwrap();
        for (idx, line) in text.lines().enumerate() {
            let pos = format!("{}:{}", file.display(), idx + 1);
            assert!(!line.contains('\t'), "{pos}: tab character");
            assert!(line.trim_end() == line, "{pos}: trailing whitespace");
            assert!(!line.contains("dbg!("), "{pos}: leftover `dbg!`");
        }
        assert!(text.ends_with('\n'), "{}: no newline at end of file", file.display());
    }
}

fn rust_files(dir: &Path, acc: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            rust_files(&path, acc);
        } else if path.extension().is_some_and(|it| it == "rs") {
            acc.push(path);
        }
    }
}
