//! 批次 Worker - 编排层
//!
//! ## 职责
//!
//! 独占一个批次，按顺序逐个处理文件：提取 → 写入。
//!
//! ## 错误处理
//!
//! - 单个文件提取/写入失败：记录日志，继续下一个文件
//! - 提取服务不可达：剩余文件不再尝试，整个批次以失败结束
//!
//! Worker 不修改任何 [`WorkerRecord`](crate::models::WorkerRecord)，
//! 只在结束时返回一个 [`WorkerOutcome`]。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::{ExtractError, WorkerError};
use crate::infrastructure::OutputWriter;
use crate::models::{ExtractionOptions, FileOutcome, FileResult, WorkerOutcome};
use crate::services::BoxedExtractor;
use crate::utils::logging::truncate_text;

/// 批次 Worker
pub struct Worker {
    id: usize,
    extractor: BoxedExtractor,
    writer: OutputWriter,
    options: Arc<ExtractionOptions>,
}

impl Worker {
    pub fn new(
        id: usize,
        extractor: BoxedExtractor,
        writer: OutputWriter,
        options: Arc<ExtractionOptions>,
    ) -> Self {
        Self {
            id,
            extractor,
            writer,
            options,
        }
    }

    /// 按给定顺序处理整个批次
    ///
    /// 同一时间只有一个文件在提取中。批次处理完（或遇到批次级错误）后
    /// 返回唯一的结果，Worker 不再接收新的工作。
    pub async fn process(self, batch: Vec<PathBuf>) -> WorkerOutcome {
        let total = batch.len();
        info!("[Worker {}] 🚀 已启动，共 {} 个任务", self.id, total);

        let mut results = Vec::with_capacity(total);
        let mut remaining = batch.into_iter().enumerate();

        while let Some((index, file)) = remaining.next() {
            info!("[Worker {}] 处理第 {}/{} 个文件", self.id, index + 1, total);

            match self.process_file(&file).await {
                Ok(outcome) => results.push(FileResult::new(file, outcome)),
                Err(fatal) => {
                    error!(
                        "[Worker {}] ❌ 提取服务不可用，终止批次 (剩余 {} 个文件未处理): {}",
                        self.id,
                        total - index - 1,
                        fatal
                    );
                    results.push(FileResult::new(
                        file,
                        FileOutcome::ExtractFailed(fatal.to_string()),
                    ));
                    results.extend(
                        remaining.map(|(_, rest)| FileResult::new(rest, FileOutcome::NotAttempted)),
                    );
                    return WorkerOutcome::failed(
                        self.id,
                        results,
                        WorkerError::BatchFailed {
                            worker_id: self.id,
                            message: fatal.to_string(),
                        },
                    );
                }
            }
        }

        info!("[Worker {}] ✅ 已完成", self.id);
        WorkerOutcome::succeeded(self.id, results)
    }

    /// 处理单个文件
    ///
    /// # 返回
    /// - `Ok(outcome)`: 文件已处理（成功或单文件失败，均已记录日志）
    /// - `Err(e)`: 批次级错误，调用方应停止后续处理
    pub async fn process_file(&self, path: &Path) -> Result<FileOutcome, ExtractError> {
        info!("[Worker {}] 📄 正在处理文件 {}", self.id, path.display());

        let text = match self.extractor.extract(path, &self.options).await {
            Ok(text) => text,
            Err(e) if e.is_batch_fatal() => return Err(e),
            Err(e) => {
                error!(
                    "[Worker {}] ❌ 文件提取失败 {}: {}",
                    self.id,
                    path.display(),
                    e
                );
                return Ok(FileOutcome::ExtractFailed(e.to_string()));
            }
        };

        if text.trim().is_empty() {
            warn!("[Worker {}] ⚠️ 提取结果为空: {}", self.id, path.display());
        } else {
            debug!(
                "[Worker {}] 文本预览: {}",
                self.id,
                truncate_text(text.trim(), 80)
            );
        }

        let artifact = self.writer.artifact_for(path, text);
        if self.writer.save_artifact(&artifact).await {
            Ok(FileOutcome::Written(artifact.path))
        } else {
            Ok(FileOutcome::WriteFailed(artifact.path))
        }
    }
}
