use std::{
    fs,
    path::{Path, PathBuf},
};

#[test]
fn test_no_trailing_whitespace_or_debug_leftovers() {
    let root = project_root();
    let mut failures = Vec::new();
    for dir in ["src", "tests", "demos", "xtask/src"] {
        for path in rust_files(&root.join(dir)) {
            let text = fs::read_to_string(&path).unwrap();
            for (i, line) in text.lines().enumerate() {
                if line.ends_with(' ') || line.ends_with('\t') {
                    failures.push(format!("{}:{}: trailing whitespace", path.display(), i + 1));
                }
                if line.contains(concat!("dbg", "!(")) {
                    failures.push(format!("{}:{}: leftover dbg", path.display(), i + 1));
                }
            }
        }
    }
    assert!(failures.is_empty(), "\n{}\n", failures.join("\n"));
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut res = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else { return res };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            res.extend(rust_files(&path));
        } else if path.extension().map_or(false, |it| it == "rs") {
            res.push(path);
        }
    }
    res.sort();
    res
}
