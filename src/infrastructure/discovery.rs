//! 文件发现 - 基础设施层
//!
//! 递归扫描输入目录，只保留指定扩展名的文件

use std::path::Path;

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::DiscoveryError;
use crate::models::FileList;

/// 构建扩展名过滤器（区分大小写，匹配文件名结尾）
pub fn extension_filter(extension: &str) -> Result<Regex, DiscoveryError> {
    let ext = extension.trim_start_matches('.');
    Regex::new(&format!(r"\.{}$", regex::escape(ext))).map_err(|source| {
        DiscoveryError::InvalidFilter {
            extension: extension.to_string(),
            source,
        }
    })
}

/// 递归列出输入目录下所有匹配扩展名的文件
///
/// 返回绝对路径；同一目录内按文件名排序，保证每次运行顺序一致。
/// 任何遍历错误都会中止整个发现过程。
pub fn discover_files(input_folder: &Path, extension: &str) -> Result<FileList, DiscoveryError> {
    let filter = extension_filter(extension)?;

    let root = input_folder
        .canonicalize()
        .map_err(|_| DiscoveryError::DirectoryNotFound(input_folder.to_path_buf()))?;
    if !root.is_dir() {
        return Err(DiscoveryError::DirectoryNotFound(input_folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::WalkFailed {
            path: root.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if filter.is_match(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }

    debug!("在 {} 中发现 {} 个文件", root.display(), files.len());
    Ok(FileList::new(files))
}

/// 在阻塞线程池中执行 [`discover_files`]，不占用异步运行时线程
pub async fn scan_input_folder(
    input_folder: &Path,
    extension: &str,
) -> Result<FileList, DiscoveryError> {
    let folder = input_folder.to_path_buf();
    let extension = extension.to_string();

    tokio::task::spawn_blocking(move || discover_files(&folder, &extension))
        .await
        .map_err(|e| DiscoveryError::ScanAborted(e.to_string()))?
}
