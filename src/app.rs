use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::models::RunReport;
use crate::orchestrator::Orchestrator;
use crate::services::{ExtractorFactory, TikaClientFactory};
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: Orchestrator,
}

impl App {
    /// 初始化应用（使用 Tika 提取服务）
    pub fn initialize(config: Config) -> Self {
        let factory = Arc::new(TikaClientFactory::from_config(&config));
        info!("🔗 Tika 服务: {}", config.tika_url);
        Self::with_factory(config, factory)
    }

    /// 使用自定义提取服务初始化
    pub fn with_factory(config: Config, factory: Arc<dyn ExtractorFactory>) -> Self {
        let orchestrator = Orchestrator::from_config(factory, &config);
        Self {
            config,
            orchestrator,
        }
    }

    /// 运行应用主逻辑
    ///
    /// Worker 的成败只体现在返回的报告中，不影响本函数的返回值。
    pub async fn run(&self) -> Result<RunReport> {
        log_startup(
            &self.config.input_folder,
            &self.config.output_folder,
            &self.config.ocr_language,
        );

        let report = self
            .orchestrator
            .run(
                Path::new(&self.config.input_folder),
                Path::new(&self.config.output_folder),
            )
            .await
            .with_context(|| format!("批量提取失败: {}", self.config.input_folder))?;

        print_final_stats(&report);

        if let Some(report_file) = &self.config.report_file {
            let json = report.to_json().context("无法序列化运行报告")?;
            tokio::fs::write(report_file, json)
                .await
                .with_context(|| format!("无法写入运行报告: {}", report_file))?;
            info!("\n报告已保存至: {}", report_file);
        }

        Ok(report)
    }
}
