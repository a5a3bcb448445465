use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/ytq/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YtqConfig {
    /// Folder that receives audio files and the yt-dlp download archive.
    pub download_dir: PathBuf,
    /// Maximum number of yt-dlp processes running at once.
    pub max_workers: usize,
    /// yt-dlp executable (name on PATH or absolute path).
    pub ytdlp_path: String,
    /// yt-dlp format selector.
    pub format: String,
    /// Audio codec passed to `--audio-format`; also the extension of finished files.
    pub audio_format: String,
    /// `--audio-quality`: a bitrate in kbit/s (`192`, `320K`) or a VBR level
    /// from `0` (best) to `10` (worst).
    pub audio_quality: String,
    /// Send a desktop notification when a run finishes.
    pub notify: bool,
}

impl Default for YtqConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            max_workers: 4,
            ytdlp_path: "yt-dlp".to_string(),
            format: "bestaudio/best".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            notify: true,
        }
    }
}

impl YtqConfig {
    /// Download folder for this invocation: `override_dir` wins, relative paths
    /// are resolved against the current directory.
    pub fn resolve_download_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = override_dir.unwrap_or(&self.download_dir);
        if dir.is_absolute() {
            return Ok(dir.to_path_buf());
        }
        let cwd = std::env::current_dir().context("current directory")?;
        Ok(cwd.join(dir))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ytq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<YtqConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

pub fn load_or_init_at(path: &Path) -> Result<YtqConfig> {
    if !path.exists() {
        let default_cfg = YtqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: YtqConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = YtqConfig::default();
        assert_eq!(cfg.download_dir, PathBuf::from("downloads"));
        assert_eq!(cfg.max_workers, 4);
        assert_eq!(cfg.ytdlp_path, "yt-dlp");
        assert_eq!(cfg.format, "bestaudio/best");
        assert_eq!(cfg.audio_format, "mp3");
        assert_eq!(cfg.audio_quality, "192");
        assert!(cfg.notify);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml = r#"
            max_workers = 2
            audio_format = "opus"
        "#;
        let cfg: YtqConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_workers, 2);
        assert_eq!(cfg.audio_format, "opus");
        assert_eq!(cfg.ytdlp_path, "yt-dlp");
        assert_eq!(cfg.download_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn load_or_init_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.max_workers, 4);

        std::fs::write(&path, "notify = false\ndownload_dir = \"/srv/music\"\n").unwrap();
        let cfg = load_or_init_at(&path).unwrap();
        assert!(!cfg.notify);
        assert_eq!(cfg.download_dir, PathBuf::from("/srv/music"));
    }

    #[test]
    fn override_dir_wins_and_relative_is_joined() {
        let cfg = YtqConfig::default();
        let abs = cfg
            .resolve_download_dir(Some(Path::new("/tmp/ytq-out")))
            .unwrap();
        assert_eq!(abs, PathBuf::from("/tmp/ytq-out"));

        let rel = cfg.resolve_download_dir(None).unwrap();
        assert!(rel.is_absolute());
        assert!(rel.ends_with("downloads"));
    }
}
