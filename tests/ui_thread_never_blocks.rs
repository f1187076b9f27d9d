// tests/ui_thread_never_blocks.rs
// Fails if blocking calls that would freeze the UI thread creep into runtime
// code. Network I/O must go through the async reqwest client on the Tokio
// worker, and nothing outside the background orchestrator may sleep.

use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for e in entries.flatten() {
            let p = e.path();
            if p.is_dir() {
                collect_rs_files(&p, files);
            } else if p.extension().map(|s| s == "rs").unwrap_or(false) {
                files.push(p);
            }
        }
    }
}

#[test]
fn no_blocking_http_client() {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "expected to find source files under src/");

    let mut offenders = Vec::new();
    for file in &files {
        let Ok(contents) = fs::read_to_string(file) else {
            continue;
        };
        if contents.contains("reqwest::blocking") {
            offenders.push(file.clone());
        }
    }
    assert!(
        offenders.is_empty(),
        "blocking HTTP client used in runtime code: {offenders:?}"
    );
}

#[test]
fn no_thread_sleep_in_runtime_code() {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);

    let mut offenders = Vec::new();
    for file in &files {
        let Ok(contents) = fs::read_to_string(file) else {
            continue;
        };
        // tokio::time::sleep is the only sanctioned pacing mechanism; a
        // std::thread::sleep anywhere in src/ would stall a Bevy system.
        if contents.contains("std::thread::sleep") || contents.contains("thread::sleep") {
            offenders.push(file.clone());
        }
    }
    assert!(
        offenders.is_empty(),
        "thread::sleep found in runtime code: {offenders:?}"
    );
}
