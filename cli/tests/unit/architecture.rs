//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify the layer boundaries:
//! domain ← application ← infra/transport ← app.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]") || trimmed.starts_with("#[cfg(all(test") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-test, non-comment lines of every file under `src/<layer>`, with
/// their display path and line number.
fn production_lines(layer: &[&str]) -> Vec<(String, usize, String)> {
    let mut dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    for part in layer {
        dir = dir.join(part);
    }

    let mut lines = Vec::new();
    for file in collect_rs_files(&dir) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            lines.push((rel.clone(), i + 1, line.to_string()));
        }
    }
    lines
}

fn violations(layer: &[&str], forbidden: &[&str]) -> Vec<String> {
    production_lines(layer)
        .into_iter()
        .filter_map(|(rel, lineno, line)| {
            forbidden
                .iter()
                .find(|pattern| line.contains(**pattern))
                .map(|pattern| format!("{rel}:{lineno}: `{pattern}`: {line}"))
        })
        .collect()
}

#[test]
fn domain_is_pure() {
    let found = violations(
        &["domain"],
        &[
            "crate::application",
            "crate::infra",
            "crate::transport",
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(
        found.is_empty(),
        "domain/ must stay free of I/O and outer layers:\n{}",
        found.join("\n")
    );
}

#[test]
fn application_does_not_reach_outward() {
    let found = violations(
        &["application"],
        &["crate::infra", "crate::transport", "crate::output", "crate::router"],
    );
    assert!(
        found.is_empty(),
        "application/ may depend only on domain/:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_transport_or_output() {
    let found = violations(&["infra"], &["crate::transport", "crate::output", "crate::router"]);
    assert!(
        found.is_empty(),
        "infra/ must not import transport/, output/ or router:\n{}",
        found.join("\n")
    );
}

#[test]
fn only_app_constructs_production_runners() {
    let mut found = Vec::new();
    let layers: [&[&str]; 4] = [&["application"], &["transport"], &["shutdown"], &["domain"]];
    for layer in layers {
        found.extend(violations(layer, &["TokioCommandRunner", "SqliteStore::new"]));
    }
    assert!(
        found.is_empty(),
        "production adapters are wired in app.rs only:\n{}",
        found.join("\n")
    );
}
