//! 文本提取服务 - 业务能力层
//!
//! 只描述"给一个文件路径和参数，返回文本或错误"这一能力，
//! 不关心具体后端（Tika、本地 OCR 或测试用的桩实现）

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ExtractError;
use crate::models::ExtractionOptions;

/// 共享的提取服务
pub type BoxedExtractor = Arc<dyn ExtractionService>;

/// 文本提取服务
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// 提取单个文件的文本
    async fn extract(&self, path: &Path, options: &ExtractionOptions) -> Result<String, ExtractError>;
}

/// 为每个 Worker 创建独立的提取服务实例
///
/// 创建失败视为 Worker 启动失败。
pub trait ExtractorFactory: Send + Sync {
    fn create(&self, worker_id: usize) -> Result<BoxedExtractor, ExtractError>;
}

/// 直接共享同一个实例
impl ExtractorFactory for BoxedExtractor {
    fn create(&self, _worker_id: usize) -> Result<BoxedExtractor, ExtractError> {
        Ok(Arc::clone(self))
    }
}
