use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const ETXTBSY: i32 = 26;

/// Write a shell script that stands in for the tesseract binary.
///
/// `--version` prints a fixed banner; any other invocation runs `body`.
pub fn write_stub_engine(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("tesseract");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 'tesseract 5.3.0-stub'; exit 0; fi\n{body}\n"
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    // A concurrently forked test process can briefly hold the script open for
    // writing; exec fails with ETXTBSY until it lets go.
    for _ in 0..100 {
        match std::process::Command::new(&path).arg("--version").output() {
            Err(e) if e.raw_os_error() == Some(ETXTBSY) => {
                std::thread::sleep(std::time::Duration::from_millis(10))
            }
            _ => break,
        }
    }
    path
}
