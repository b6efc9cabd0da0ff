use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
///
/// 只包含会中止整次运行的错误；单个文件或 Worker 的失败体现在运行报告中。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件发现错误
    #[error("文件发现错误: {0}")]
    Discovery(#[from] DiscoveryError),
    /// 输出目录错误
    #[error("输出错误: {0}")]
    Output(#[from] OutputError),
}

/// 提取服务错误
///
/// 区分两类：
/// - 单文件错误（`Io` / `Rejected` / `Timeout`）：记录后继续处理下一个文件
/// - 批次级错误（`Unavailable`）：服务不可达，当前 Worker 终止
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 读取源文件失败
    #[error("读取文件失败 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 服务拒绝处理该文件
    #[error("提取服务拒绝处理 {path} (状态码: {status}): {message}")]
    Rejected {
        path: PathBuf,
        status: u16,
        message: String,
    },
    /// 单个文件处理超时
    #[error("提取超时: {path}")]
    Timeout { path: PathBuf },
    /// 提取服务不可达
    #[error("提取服务不可达 ({endpoint}): {message}")]
    Unavailable { endpoint: String, message: String },
    /// 创建客户端失败
    #[error("无法创建提取客户端: {0}")]
    ClientSetup(String),
}

impl ExtractError {
    /// 是否为批次级（不可恢复）错误
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, ExtractError::Unavailable { .. })
    }
}

/// 文件发现错误
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// 输入目录不存在
    #[error("目录不存在: {0}")]
    DirectoryNotFound(PathBuf),
    /// 遍历目录失败
    #[error("无法读取目录 ({path}): {source}")]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    /// 扫描任务异常终止
    #[error("目录扫描任务异常终止: {0}")]
    ScanAborted(String),
    /// 扩展名过滤器无效
    #[error("无效的扩展名过滤器 '{extension}': {source}")]
    InvalidFilter {
        extension: String,
        #[source]
        source: regex::Error,
    },
}

/// 输出目录错误
#[derive(Debug, Error)]
pub enum OutputError {
    /// 创建输出目录失败
    #[error("无法创建输出目录 ({path}): {source}")]
    CreateFolderFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 输出路径存在但不是目录
    #[error("输出路径不是目录: {0}")]
    NotADirectory(PathBuf),
}

/// Worker 生命周期错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerError {
    /// Worker 启动失败
    #[error("Worker {worker_id} 启动失败: {message}")]
    SpawnFailed { worker_id: usize, message: String },
    /// Worker 意外终止
    #[error("Worker {worker_id} 意外终止: {message}")]
    Terminated { worker_id: usize, message: String },
    /// 批次级错误导致 Worker 失败
    #[error("Worker {worker_id} 批次处理失败: {message}")]
    BatchFailed { worker_id: usize, message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
