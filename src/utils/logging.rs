/// 日志工具模块
///
/// 提供日志初始化以及运行横幅、统计信息的输出函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{PartitionPlan, RunReport};

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug / info。
/// 重复调用是安全的（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 当前本地时间（用于日志与报告）
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 记录程序启动信息
///
/// # 参数
/// - `input_folder`: 输入目录
/// - `output_folder`: 输出目录
/// - `ocr_language`: OCR 语言
pub fn log_startup(input_folder: &str, output_folder: &str, ocr_language: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - PDF 批量文本提取");
    info!("📂 输入目录: {}", input_folder);
    info!("📁 输出目录: {}", output_folder);
    info!("🔤 OCR 语言: {}", ocr_language);
    info!("{}", "=".repeat(60));
}

/// 记录分区计划
pub fn log_plan(plan: &PartitionPlan) {
    info!(
        "📋 共 {} 个文件，启动 {} 个 Worker...",
        plan.file_count(),
        plan.worker_count()
    );
    for batch in plan.batches() {
        if batch.is_empty() {
            info!("   Worker {}: 无文件", batch.worker_id);
        } else {
            info!("   Worker {}: {} 个文件", batch.worker_id, batch.len());
        }
    }
}

/// 打印最终统计信息
pub fn print_final_stats(report: &RunReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!("开始时间: {}", report.started_at);
    info!("完成时间: {}", report.finished_at);
    info!("{}", "=".repeat(60));
    info!("✅ 成功写入: {}/{}", report.counts.written, report.total_files);
    info!("❌ 提取失败: {}", report.counts.extract_failed);
    info!("💾 写入失败: {}", report.counts.write_failed);
    info!("⏭️ 未处理: {}", report.counts.unprocessed);
    if !report.collisions.is_empty() {
        info!(
            "⚠️ 输出文件名冲突: {} 组，{} 个文件的文本被覆盖",
            report.collisions.len(),
            report.overwritten_files()
        );
    }
    info!(
        "👷 Worker: 成功 {}, 失败 {}",
        report.succeeded_workers(),
        report.failed_workers()
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
