//! Desktop integration: reveal a downloaded file and notify when a run ends.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::queue_db::{ItemId, QueueDb};
use crate::video_id;

const NOTIFY_TITLE: &str = "Downloader";
const NOTIFY_BODY: &str = "All downloads finished";

/// Platform command that opens the file manager at `path`.
pub fn reveal_command(path: &Path) -> (String, Vec<OsString>) {
    if cfg!(target_os = "macos") {
        (
            "open".into(),
            vec!["-R".into(), path.as_os_str().to_os_string()],
        )
    } else if cfg!(windows) {
        (
            "explorer".into(),
            vec!["/select,".into(), path.as_os_str().to_os_string()],
        )
    } else {
        let dir = path.parent().unwrap_or(path);
        ("xdg-open".into(), vec![dir.as_os_str().to_os_string()])
    }
}

/// Open the file manager at `path`.
pub async fn reveal(path: &Path) -> Result<()> {
    let (program, args) = reveal_command(path);
    Command::new(&program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("could not open folder for {}", path.display()))?;
    Ok(())
}

/// Find the audio file of an item: the stored path if it still exists,
/// otherwise a `<id> - *.<ext>` match in `dir` (which is then stored).
pub async fn locate_item_file(
    db: &QueueDb,
    item_id: ItemId,
    dir: &Path,
    ext: &str,
) -> Result<Option<PathBuf>> {
    let item = db
        .get_item(item_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("item {} not found", item_id))?;

    if let Some(stored) = item.output_path.as_deref().map(PathBuf::from) {
        if stored.exists() {
            return Ok(Some(stored));
        }
    }

    let Some(found) = video_id::find_existing_path(&item.url, dir, ext) else {
        return Ok(None);
    };
    db.set_output_path(item_id, &found.to_string_lossy()).await?;
    Ok(Some(found))
}

fn notify_command() -> (String, Vec<String>) {
    if cfg!(target_os = "macos") {
        (
            "osascript".into(),
            vec![
                "-e".into(),
                format!("display notification \"{NOTIFY_BODY}\" with title \"{NOTIFY_TITLE}\""),
            ],
        )
    } else if cfg!(windows) {
        let script = format!(
            "[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime];\
             $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02);\
             $template.GetElementsByTagName('text').Item(0).AppendChild($template.CreateTextNode('{NOTIFY_TITLE}')) | Out-Null;\
             $template.GetElementsByTagName('text').Item(1).AppendChild($template.CreateTextNode('{NOTIFY_BODY}')) | Out-Null;\
             $toast = [Windows.UI.Notifications.ToastNotification]::new($template);\
             [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{NOTIFY_TITLE}').Show($toast);"
        );
        ("powershell".into(), vec!["-Command".into(), script])
    } else {
        (
            "notify-send".into(),
            vec![NOTIFY_TITLE.into(), NOTIFY_BODY.into()],
        )
    }
}

/// Best-effort "all downloads finished" notification; failures are only logged.
pub async fn notify_complete() {
    let (program, args) = notify_command();
    match Command::new(&program)
        .args(&args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
    {
        Ok(status) if !status.success() => {
            tracing::debug!(%program, "notification command exited with {}", status)
        }
        Ok(_) => {}
        Err(e) => tracing::debug!(%program, "notification unavailable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue_db::open_memory;

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn reveal_opens_parent_dir_on_linux() {
        let (program, args) = reveal_command(Path::new("/music/abc - Song.mp3"));
        assert_eq!(program, "xdg-open");
        assert_eq!(args, vec![OsString::from("/music")]);
    }

    #[tokio::test]
    async fn locate_prefers_stored_then_scans_dir() {
        let db = open_memory().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let id = db.add_item("https://youtu.be/dQw4w9WgXcQ").await.unwrap();

        assert_eq!(
            locate_item_file(&db, id, dir.path(), "mp3").await.unwrap(),
            None
        );

        let file = dir.path().join("dQw4w9WgXcQ - Song.mp3");
        std::fs::write(&file, b"id3").unwrap();
        assert_eq!(
            locate_item_file(&db, id, dir.path(), "mp3").await.unwrap(),
            Some(file.clone())
        );
        let stored = db.get_item(id).await.unwrap().unwrap().output_path;
        assert_eq!(stored.as_deref(), Some(&*file.to_string_lossy()));
    }

    #[tokio::test]
    async fn locate_unknown_item_is_error() {
        let db = open_memory().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_item_file(&db, 42, dir.path(), "mp3").await.is_err());
    }
}
