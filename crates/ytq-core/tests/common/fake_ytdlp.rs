//! Stand-in yt-dlp executables (POSIX shell scripts) for scheduler tests.
//!
//! All scripts are written once, before any test spawns a process, so no
//! script is ever open for writing while another thread forks.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tempfile::TempDir;

pub struct FakeScripts {
    _dir: TempDir,
    /// Prints progress, writes `<id> - Fake Title.mp3`, prints the path.
    pub ok: PathBuf,
    /// Fails with a yt-dlp style error on stderr.
    pub failing: PathBuf,
    /// Reports a little progress and then hangs.
    pub slow: PathBuf,
    /// Dumps a two-entry flat playlist.
    pub playlist: PathBuf,
}

const ARG_LOOP: &str = r#"out=""; url=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    --) url="$2"; shift 2 ;;
    *) shift ;;
  esac
done
"#;

const OK_BODY: &str = r#"id="${url##*/}"
dir="$(dirname "$out")"
file="$dir/$id - Fake Title.mp3"
echo "[youtube] Extracting URL: $url"
echo "ytq-progress|downloading|25|100|NA"
echo "ytq-progress|downloading|50|NA|100"
echo "ytq-progress|finished|100|100|NA"
printf 'audio' > "$file"
echo "ytq-file|$file"
"#;

const FAILING_BODY: &str = r#"echo "WARNING: retrying" >&2
echo "ERROR: [youtube] $url: Video unavailable" >&2
exit 1
"#;

const SLOW_BODY: &str = r#"echo "ytq-progress|downloading|1|100|NA"
exec sleep 30
"#;

const PLAYLIST_BODY: &str = r#"cat <<'JSON'
{"_type": "playlist", "title": "Mix", "entries": [
  {"id": "aaaaaaaaaaa", "title": "First"},
  {"url": "https://www.youtube.com/watch?v=bbbbbbbbbbb", "title": null}
]}
JSON
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let script = format!("#!/bin/sh\n{ARG_LOOP}{body}");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

pub fn scripts() -> &'static FakeScripts {
    static SCRIPTS: OnceLock<FakeScripts> = OnceLock::new();
    SCRIPTS.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        FakeScripts {
            ok: write_script(dir.path(), "ok", OK_BODY),
            failing: write_script(dir.path(), "failing", FAILING_BODY),
            slow: write_script(dir.path(), "slow", SLOW_BODY),
            playlist: write_script(dir.path(), "playlist", PLAYLIST_BODY),
            _dir: dir,
        }
    })
}
