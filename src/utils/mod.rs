pub mod logging;

use std::io;
use std::path::Path;

/// 确保文件所在目录存在
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// 前端目录下的入口页面
pub fn index_document(static_dir: &Path) -> std::path::PathBuf {
    static_dir.join("index.html")
}
