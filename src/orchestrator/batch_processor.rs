//! 批量提取编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是一次运行的调度中心，负责分区、启动 Worker 和观察其生命周期。
//!
//! ## 核心功能
//!
//! 1. **准备**：确保输出目录存在，递归扫描输入文件
//! 2. **分区**：`min(并行度, 文件数)` 个 Worker，每个 Worker 一个批次
//! 3. **启动**：每个批次一个 tokio 任务，各自持有独立的提取服务实例
//! 4. **观察**：记录启动失败、意外终止以及 Worker 自报的结果
//! 5. **汇总**：等待所有 Worker 结束，生成 [`RunReport`]
//!
//! ## 设计特点
//!
//! - **不重试、不重新分配**：Worker 失败后其剩余文件在本次运行中不再处理
//! - **无共享可变状态**：批次在启动时移交给 Worker
//! - **同名输出串行写入**：不同子目录下的同名文件映射到同一个 `.txt`，
//!   这些文件分到同一批次依次写入（最后一个生效），并在报告中列出
//! - **单 Worker 退化**：按运行模式可改用 [`SequentialRunner`]

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::config::{Config, RunMode, TraversalOrder};
use crate::error::{AppResult, WorkerError};
use crate::infrastructure::{
    ensure_output_folder, find_collisions, output_path, scan_input_folder, OutputWriter,
};
use crate::models::{
    ExtractionOptions, FileList, PartitionPlan, RunReport, WorkerOutcome, WorkerRecord,
};
use crate::orchestrator::partition::{available_parallelism, partition_by_key, worker_count};
use crate::orchestrator::sequential::SequentialRunner;
use crate::orchestrator::worker::Worker;
use crate::services::ExtractorFactory;
use crate::utils::logging::{log_plan, timestamp};

/// 批量提取编排器
pub struct Orchestrator {
    factory: Arc<dyn ExtractorFactory>,
    options: Arc<ExtractionOptions>,
    file_extension: String,
    max_workers: Option<usize>,
    run_mode: RunMode,
    sequential_order: TraversalOrder,
}

impl Orchestrator {
    /// 创建编排器，默认处理 `.pdf` 文件，并行度取 CPU 数量
    pub fn new(factory: Arc<dyn ExtractorFactory>, options: ExtractionOptions) -> Self {
        Self {
            factory,
            options: Arc::new(options),
            file_extension: "pdf".to_string(),
            max_workers: None,
            run_mode: RunMode::Auto,
            sequential_order: TraversalOrder::Reverse,
        }
    }

    /// 按配置创建编排器
    pub fn from_config(factory: Arc<dyn ExtractorFactory>, config: &Config) -> Self {
        Self::new(factory, config.extraction_options())
            .with_extension(config.file_extension.clone())
            .with_max_workers(config.max_workers)
            .with_run_mode(config.run_mode)
            .with_sequential_order(config.sequential_order)
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }

    pub fn with_sequential_order(mut self, order: TraversalOrder) -> Self {
        self.sequential_order = order;
        self
    }

    /// 实际使用的并行度上限
    pub fn parallelism(&self) -> usize {
        self.max_workers
            .unwrap_or_else(available_parallelism)
            .max(1)
    }

    /// 运行一次完整的批量提取
    ///
    /// 输出目录创建失败或输入目录无法读取时直接返回错误，不会启动任何 Worker。
    /// 单个 Worker 的失败只体现在报告中。
    pub async fn run(&self, input_folder: &Path, output_folder: &Path) -> AppResult<RunReport> {
        let started_at = timestamp();

        ensure_output_folder(output_folder).await?;

        info!("\n📁 正在扫描待处理的文件...");
        let files = scan_input_folder(input_folder, &self.file_extension).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待处理的 .{} 文件，程序结束", self.file_extension);
            return Ok(RunReport::empty(started_at));
        }

        let count = worker_count(self.parallelism(), files.len());
        info!("✓ 找到 {} 个待处理的文件", files.len());

        let collisions = find_collisions(output_folder, &files);
        for collision in &collisions {
            let inputs: Vec<String> = collision
                .inputs
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            warn!(
                "⚠️ {} 个输入文件映射到同一输出 {}，只保留最后写入的文本: {}",
                inputs.len(),
                collision.output.display(),
                inputs.join(", ")
            );
        }

        let writer = OutputWriter::new(output_folder);
        let records = if self.use_sequential(count) {
            self.run_sequential(&files, writer).await
        } else {
            let plan = partition_by_key(&files, count, |p| output_path(output_folder, p));
            log_plan(&plan);
            self.run_plan(plan, writer).await
        };

        Ok(RunReport::new(started_at, files.len(), records).with_collisions(collisions))
    }

    fn use_sequential(&self, worker_count: usize) -> bool {
        match self.run_mode {
            RunMode::Sequential => true,
            RunMode::Parallel => false,
            RunMode::Auto => worker_count <= 1,
        }
    }

    /// 启动分区计划中的所有 Worker 并等待它们结束
    pub async fn run_plan(&self, plan: PartitionPlan, writer: OutputWriter) -> Vec<WorkerRecord> {
        let mut records: Vec<WorkerRecord> = plan
            .batches()
            .iter()
            .map(|b| WorkerRecord::new(b.worker_id, b.len()))
            .collect();

        let mut running = Vec::new();
        let mut handles = Vec::new();

        for (index, batch) in plan.into_batches().into_iter().enumerate() {
            let worker_id = batch.worker_id;

            // 每个 Worker 独立的提取服务实例，创建失败即启动失败
            let extractor = match self.factory.create(worker_id) {
                Ok(extractor) => extractor,
                Err(e) => {
                    let err = WorkerError::SpawnFailed {
                        worker_id,
                        message: e.to_string(),
                    };
                    error!("❌ {}，{} 个文件本次不会被处理", err, batch.len());
                    records[index].abort(&err);
                    continue;
                }
            };

            let worker = Worker::new(
                worker_id,
                extractor,
                writer.clone(),
                Arc::clone(&self.options),
            );
            records[index].mark_running();

            let handle = tokio::spawn(async move { worker.process(batch.files).await });
            running.push(index);
            handles.push(handle);
        }

        info!("✓ 已启动 {}/{} 个 Worker", handles.len(), records.len());

        let results = join_all(handles).await;
        for (index, result) in running.into_iter().zip(results) {
            let record = &mut records[index];
            match result {
                Ok(outcome) => observe_outcome(record, &outcome),
                Err(join_err) => {
                    let err = WorkerError::Terminated {
                        worker_id: record.id,
                        message: join_err.to_string(),
                    };
                    error!("❌ {}", err);
                    record.abort(&err);
                }
            }
        }

        records
    }

    /// 单 Worker 顺序处理完整文件列表
    async fn run_sequential(&self, files: &FileList, writer: OutputWriter) -> Vec<WorkerRecord> {
        const WORKER_ID: usize = 1;
        let mut record = WorkerRecord::new(WORKER_ID, files.len());

        let extractor = match self.factory.create(WORKER_ID) {
            Ok(extractor) => extractor,
            Err(e) => {
                let err = WorkerError::SpawnFailed {
                    worker_id: WORKER_ID,
                    message: e.to_string(),
                };
                error!("❌ {}", err);
                record.abort(&err);
                return vec![record];
            }
        };

        info!("📋 顺序模式 ({:?})，共 {} 个文件", self.sequential_order, files.len());
        record.mark_running();

        let worker = Worker::new(WORKER_ID, extractor, writer, Arc::clone(&self.options));
        let outcome = SequentialRunner::new(worker, self.sequential_order)
            .run(files)
            .await;
        observe_outcome(&mut record, &outcome);

        vec![record]
    }
}

/// 记录 Worker 自报的结果
fn observe_outcome(record: &mut WorkerRecord, outcome: &WorkerOutcome) {
    record.complete(outcome);
    match &outcome.failure {
        None => info!(
            "[Worker {}] ✓ 成功: 写入 {}，提取失败 {}，写入失败 {}",
            record.id,
            record.counts.written,
            record.counts.extract_failed,
            record.counts.write_failed
        ),
        Some(e) => error!(
            "[Worker {}] ❌ 失败: {} (未处理 {} 个文件)",
            record.id, e, record.counts.unprocessed
        ),
    }
}
