//! 顺序处理 - 编排层
//!
//! 单 Worker 的退化形式：不分区，直接按指定顺序处理完整文件列表。
//! 逐文件的行为与 [`Worker`] 完全一致。

use std::path::PathBuf;

use tracing::info;

use crate::config::TraversalOrder;
use crate::models::{FileList, WorkerOutcome};
use crate::orchestrator::worker::Worker;
use crate::utils::logging::timestamp;

/// 按遍历顺序排列文件
pub fn ordered_files(files: &FileList, order: TraversalOrder) -> Vec<PathBuf> {
    match order {
        TraversalOrder::Forward => files.iter().map(|p| p.to_path_buf()).collect(),
        TraversalOrder::Reverse => files.iter().rev().map(|p| p.to_path_buf()).collect(),
    }
}

/// 顺序处理器
pub struct SequentialRunner {
    worker: Worker,
    order: TraversalOrder,
}

impl SequentialRunner {
    pub fn new(worker: Worker, order: TraversalOrder) -> Self {
        Self { worker, order }
    }

    pub async fn run(self, files: &FileList) -> WorkerOutcome {
        let total = files.len();
        info!("⏱️ 开始顺序处理 {} 个文件 ({})", total, timestamp());

        let outcome = self.worker.process(ordered_files(files, self.order)).await;

        info!("⏱️ 已处理完 {} 个文件 ({})", total, timestamp());
        outcome
    }
}
