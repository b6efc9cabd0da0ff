//! 输出写入 - 基础设施层
//!
//! 只负责"把提取结果写成 .txt 文件"能力，写入失败只记录日志，不向上传播

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use tracing::{error, info};

use crate::error::OutputError;
use crate::models::{FileList, OutputCollision};

/// 一个输入文件对应的输出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub text: String,
}

/// 确保输出目录存在
///
/// 只创建最后一级目录，父目录不存在时返回错误。
pub async fn ensure_output_folder(path: &Path) -> Result<(), OutputError> {
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_dir() {
            return Ok(());
        }
        return Err(OutputError::NotADirectory(path.to_path_buf()));
    }

    tokio::fs::create_dir(path)
        .await
        .map_err(|source| OutputError::CreateFolderFailed {
            path: path.to_path_buf(),
            source,
        })?;
    info!("📁 已创建输出目录: {}", path.display());
    Ok(())
}

/// 输入文件对应的输出路径：`<output_folder>/<文件名>.txt`
///
/// 文件名按原始字节保留，不做 UTF-8 转换。
pub fn output_path(output_folder: &Path, input: &Path) -> PathBuf {
    let mut file_name = input
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("unnamed"));
    file_name.push(".txt");
    normalize_path(&output_folder.join(file_name))
}

/// 找出输出路径相同的输入文件（不同子目录下的同名文件）
///
/// 按发现顺序返回，每组至少两个输入。
pub fn find_collisions(output_folder: &Path, files: &FileList) -> Vec<OutputCollision> {
    let mut groups: Vec<OutputCollision> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for input in files.iter() {
        let output = output_path(output_folder, input);
        match index.get(&output) {
            Some(&i) => groups[i].inputs.push(input.to_path_buf()),
            None => {
                index.insert(output.clone(), groups.len());
                groups.push(OutputCollision {
                    output,
                    inputs: vec![input.to_path_buf()],
                });
            }
        }
    }

    groups.retain(|g| g.inputs.len() > 1);
    groups
}

/// 按词法规则规范化路径：去掉 `.`，`..` 抵消前一个普通组件
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// 输出写入器
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_folder: PathBuf,
}

impl OutputWriter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// 为输入文件构建输出结果
    pub fn artifact_for(&self, input: &Path, text: String) -> OutputArtifact {
        OutputArtifact {
            path: output_path(&self.output_folder, input),
            text,
        }
    }

    /// 写入文本文件，已存在时覆盖
    ///
    /// # 返回
    /// 是否写入成功；失败时已记录错误日志
    pub async fn save(&self, path: &Path, text: &str) -> bool {
        let path = normalize_path(path);
        match tokio::fs::write(&path, text.as_bytes()).await {
            Ok(()) => {
                info!("💾 已保存文件 {}", path.display());
                true
            }
            Err(e) => {
                error!("❌ 保存文件失败 {}: {}", path.display(), e);
                false
            }
        }
    }

    pub async fn save_artifact(&self, artifact: &OutputArtifact) -> bool {
        self.save(&artifact.path, &artifact.text).await
    }
}
