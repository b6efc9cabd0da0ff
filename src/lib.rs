//! # PDF Text Batch
//!
//! 将大批量 PDF 文本/OCR 提取任务分配到固定数量的 Worker 上并行处理
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/discovery` - 递归扫描输入目录，按扩展名过滤
//! - `infrastructure/output_writer` - 写入 `.txt` 结果，失败只记录日志
//!
//! ### ② 业务能力层（Services）
//! - `ExtractionService` - "给文件路径和参数，返回文本"能力
//! - `TikaClient` - 基于 Apache Tika Server 的实现
//!
//! ### ③ 数据模型（Models）
//! - `ExtractionOptions` - 运行期间不变的提取参数
//! - `FileList` / `PartitionPlan` / `Batch` - 文件列表与分区
//! - `WorkerRecord` / `RunReport` - 生命周期状态与汇总
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 分区、启动并观察 Worker
//! - `orchestrator/worker` - 顺序处理单个批次
//! - `orchestrator/sequential` - 单 Worker 顺序处理
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use config::{Config, RunMode, TraversalOrder};
pub use error::{AppError, AppResult, ExtractError, WorkerError};
pub use models::{ExtractionOptions, FileList, RunReport, WorkerRecord, WorkerStatus};
pub use orchestrator::Orchestrator;
pub use services::{BoxedExtractor, ExtractionService, ExtractorFactory, TikaClient};
