//! Worker 状态与运行报告

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::error::WorkerError;

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FileOutcome {
    /// 已写入输出文件
    Written(PathBuf),
    /// 提取失败（已记录日志，继续下一个文件）
    ExtractFailed(String),
    /// 写入失败（已记录日志，继续下一个文件）
    WriteFailed(PathBuf),
    /// Worker 提前终止，未尝试
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}

impl FileResult {
    pub fn new(input: impl Into<PathBuf>, outcome: FileOutcome) -> Self {
        Self {
            input: input.into(),
            outcome,
        }
    }
}

/// Worker 处理完一个批次后发出的唯一结果
#[derive(Debug, Clone)]
pub struct WorkerOutcome {
    pub worker_id: usize,
    pub files: Vec<FileResult>,
    /// 批次级错误；`None` 表示成功
    pub failure: Option<WorkerError>,
}

impl WorkerOutcome {
    pub fn succeeded(worker_id: usize, files: Vec<FileResult>) -> Self {
        Self {
            worker_id,
            files,
            failure: None,
        }
    }

    pub fn failed(worker_id: usize, files: Vec<FileResult>, failure: WorkerError) -> Self {
        Self {
            worker_id,
            files,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Worker 生命周期状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "cause", rename_all = "snake_case")]
pub enum WorkerStatus {
    Pending,
    Running,
    Succeeded,
    Failed(String),
}

impl WorkerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerStatus::Succeeded | WorkerStatus::Failed(_))
    }
}

/// 多个输入文件映射到同一个输出文件
///
/// 这些输入会被分到同一批次顺序写入，最终只保留最后一个的文本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputCollision {
    pub output: PathBuf,
    /// 按发现顺序排列
    pub inputs: Vec<PathBuf>,
}

impl OutputCollision {
    /// 被后续文件覆盖的输入数量
    pub fn overwritten(&self) -> usize {
        self.inputs.len().saturating_sub(1)
    }
}

/// 处理计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileCounts {
    pub written: usize,
    pub extract_failed: usize,
    pub write_failed: usize,
    pub unprocessed: usize,
}

impl FileCounts {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Written(_) => self.written += 1,
            FileOutcome::ExtractFailed(_) => self.extract_failed += 1,
            FileOutcome::WriteFailed(_) => self.write_failed += 1,
            FileOutcome::NotAttempted => self.unprocessed += 1,
        }
    }

    fn add(&mut self, other: &FileCounts) {
        self.written += other.written;
        self.extract_failed += other.extract_failed;
        self.write_failed += other.write_failed;
        self.unprocessed += other.unprocessed;
    }
}

/// Worker 记录
///
/// 只由编排器根据生命周期事件修改，Worker 自身只通过 [`WorkerOutcome`] 通信。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerRecord {
    pub id: usize,
    pub batch_len: usize,
    pub status: WorkerStatus,
    pub counts: FileCounts,
}

impl WorkerRecord {
    pub fn new(id: usize, batch_len: usize) -> Self {
        Self {
            id,
            batch_len,
            status: WorkerStatus::Pending,
            counts: FileCounts::default(),
        }
    }

    pub fn mark_running(&mut self) {
        if self.status == WorkerStatus::Pending {
            self.status = WorkerStatus::Running;
        }
    }

    /// 根据 Worker 结果进入终态，已处于终态时忽略
    pub fn complete(&mut self, outcome: &WorkerOutcome) {
        if self.status.is_terminal() {
            warn!("Worker {} 已结束，忽略重复的结果", self.id);
            return;
        }
        self.counts = FileCounts::default();
        for file in &outcome.files {
            self.counts.record(&file.outcome);
        }
        self.status = match &outcome.failure {
            None => WorkerStatus::Succeeded,
            Some(e) => WorkerStatus::Failed(e.to_string()),
        };
    }

    /// Worker 未能启动或意外终止：整个批次视为未处理
    pub fn abort(&mut self, error: &WorkerError) {
        if self.status.is_terminal() {
            warn!("Worker {} 已结束，忽略: {}", self.id, error);
            return;
        }
        self.counts = FileCounts {
            unprocessed: self.batch_len,
            ..FileCounts::default()
        };
        self.status = WorkerStatus::Failed(error.to_string());
    }
}

/// 一次运行的汇总报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub total_files: usize,
    pub counts: FileCounts,
    pub workers: Vec<WorkerRecord>,
    /// 输出文件名冲突
    pub collisions: Vec<OutputCollision>,
}

impl RunReport {
    pub fn new(started_at: String, total_files: usize, workers: Vec<WorkerRecord>) -> Self {
        let mut counts = FileCounts::default();
        for worker in &workers {
            counts.add(&worker.counts);
        }
        Self {
            started_at,
            finished_at: crate::utils::logging::timestamp(),
            total_files,
            counts,
            workers,
            collisions: Vec::new(),
        }
    }

    pub fn with_collisions(mut self, collisions: Vec<OutputCollision>) -> Self {
        self.collisions = collisions;
        self
    }

    /// 因输出文件名冲突而被覆盖的输入数量
    pub fn overwritten_files(&self) -> usize {
        self.collisions.iter().map(OutputCollision::overwritten).sum()
    }

    /// 没有需要处理的文件
    pub fn empty(started_at: String) -> Self {
        Self::new(started_at, 0, Vec::new())
    }

    pub fn succeeded_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| w.status == WorkerStatus::Succeeded)
            .count()
    }

    pub fn failed_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| matches!(w.status, WorkerStatus::Failed(_)))
            .count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
