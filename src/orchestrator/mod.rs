//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责分区和 Worker 调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量提取编排器
//! - 确保输出目录、扫描输入文件
//! - 计算 Worker 数量和分区计划
//! - 为每个批次启动一个 Worker 并观察其生命周期
//! - 汇总运行报告
//!
//! ### `partition` - 分区计算
//! - `min(并行度, 文件数)` 个批次，完整覆盖、互不重叠、大小均衡
//! - 输出文件名相同的输入分到同一批次
//!
//! ### `worker` - 批次 Worker
//! - 按顺序处理一个批次，单文件失败不影响后续文件
//!
//! ### `sequential` - 顺序处理
//! - 不分区，按明确的遍历顺序处理完整文件列表
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 FileList)
//!     ↓
//! partition → PartitionPlan (Vec<Batch>)
//!     ↓
//! worker / sequential (处理单个 Batch)
//!     ↓
//! services (能力层：extract)  +  infrastructure (output_writer)
//! ```

pub mod batch_processor;
pub mod partition;
pub mod sequential;
pub mod worker;

// 重新导出主要类型
pub use batch_processor::Orchestrator;
pub use partition::{available_parallelism, partition, partition_by_key, worker_count};
pub use sequential::{ordered_files, SequentialRunner};
pub use worker::Worker;
