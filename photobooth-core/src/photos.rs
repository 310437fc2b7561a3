//! 照片目录的只读访问
//!
//! 照片由相机以 `photo_<毫秒时间戳>.jpg` 命名写入，因此按文件名排序即按拍摄时间排序。

use crate::Result;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

const PHOTO_EXTENSION: &str = ".jpg";

/// Lists the `*.jpg` file names in `dir`, sorted ascending.
pub async fn list_photos(dir: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut photos = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        // 非 UTF-8 文件名无法放进 URL，直接跳过
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.ends_with(PHOTO_EXTENSION) {
            photos.push(name);
        }
    }

    photos.sort();
    tracing::debug!("Found {} photos in {}", photos.len(), dir.display());
    Ok(photos)
}

/// 最近一张照片；目录为空时返回 `None`
pub async fn last_photo(dir: &Path) -> Result<Option<String>> {
    Ok(list_photos(dir).await?.pop())
}

/// 把请求中的照片名解析为目录内的路径。
///
/// 只接受单个普通文件名；`..`、子目录、绝对路径一律返回 `None`。
pub fn photo_path(dir: &Path, name: &str) -> Option<PathBuf> {
    if name.contains(['/', '\\']) {
        return None;
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(dir.join(name)),
        _ => None,
    }
}

/// Reads one photo. `Ok(None)` covers both an unsafe name and a missing file.
pub async fn read_photo(dir: &Path, name: &str) -> Result<Option<Vec<u8>>> {
    let Some(path) = photo_path(dir, name) else {
        return Ok(None);
    };
    match fs::read(&path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
