//! Test utilities for apebuild-lib.
//!
//! Fake packaging and compiler tools written as small shell scripts, so the
//! pipeline can be exercised without the real toolchain installed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::execute::CommandLine;

/// Returns a command running `script` through `/bin/sh -c`.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> CommandLine {
  CommandLine::new("/bin/sh").arg("-c").arg(script)
}

/// Write an executable shell script to `dir/name`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// A packager that copies its input to the `-o` path and appends one line
/// per call (`<arch or default> <input>`) to `log`.
#[cfg(unix)]
pub fn fake_packager(dir: &Path, log: &Path) -> PathBuf {
  write_script(
    dir,
    "zipobj",
    &format!(
      r#"arch=default
out=""
while [ $# -gt 1 ]; do
  case "$1" in
    -a) arch="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) break ;;
  esac
done
echo "$arch $1" >> "{log}"
cp "$1" "$out""#,
      log = log.display()
    ),
  )
}

/// A packager that always exits with status 4.
#[cfg(unix)]
pub fn failing_packager(dir: &Path) -> PathBuf {
  write_script(dir, "zipobj", "echo 'zipobj: cannot read input' >&2\nexit 4")
}

/// A packager that writes the `-o` object for the default architecture but
/// exits with status 5 whenever `-a` is given.
#[cfg(unix)]
pub fn secondary_failing_packager(dir: &Path) -> PathBuf {
  write_script(
    dir,
    "zipobj",
    r#"out=""
while [ $# -gt 1 ]; do
  case "$1" in
    -a) echo "zipobj: unsupported arch $2" >&2; exit 5 ;;
    -o) out="$2"; shift 2 ;;
    *) break ;;
  esac
done
cp "$1" "$out""#,
  )
}

/// A compiler that writes each argument on its own line to `args_file`
/// and creates the `-o` output.
#[cfg(unix)]
pub fn fake_compiler(dir: &Path, args_file: &Path) -> PathBuf {
  write_script(
    dir,
    "cosmoc++",
    &format!(
      r#"printf '%s\n' "$@" > "{args}"
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then echo binary > "$2"; fi
  shift
done"#,
      args = args_file.display()
    ),
  )
}

/// A compiler that always exits with status 1.
#[cfg(unix)]
pub fn failing_compiler(dir: &Path) -> PathBuf {
  write_script(dir, "cosmoc++", "echo 'error: undefined reference' >&2\nexit 1")
}
