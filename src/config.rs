use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::ExtractionOptions;

/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "PDF_BATCH_CONFIG";

/// 运行模式
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// 只有一个 Worker 时退化为顺序处理，否则并行
    #[default]
    Auto,
    /// 始终并行
    Parallel,
    /// 始终顺序处理
    Sequential,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(RunMode::Auto),
            "parallel" => Ok(RunMode::Parallel),
            "sequential" => Ok(RunMode::Sequential),
            other => Err(format!("未知的运行模式: {}", other)),
        }
    }
}

/// 顺序模式下的遍历顺序
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    /// 按发现顺序
    Forward,
    /// 从最后发现的文件开始
    #[default]
    Reverse,
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(TraversalOrder::Forward),
            "reverse" => Ok(TraversalOrder::Reverse),
            other => Err(format!("未知的遍历顺序: {}", other)),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 输入目录（递归扫描）
    pub input_folder: String,
    /// 输出目录（不存在时创建，仅一级）
    pub output_folder: String,
    /// OCR 语言代码
    pub ocr_language: String,
    /// 需要处理的文件扩展名
    pub file_extension: String,
    /// 最大 Worker 数量，未设置时使用 CPU 并行度
    pub max_workers: Option<usize>,
    /// Tika 服务地址
    pub tika_url: String,
    /// 单个请求超时（秒）
    pub request_timeout_secs: u64,
    pub run_mode: RunMode,
    pub sequential_order: TraversalOrder,
    pub auto_space: bool,
    pub extract_inline_images: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行报告（JSON）输出路径
    pub report_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "./pdf/".to_string(),
            output_folder: "./text/".to_string(),
            ocr_language: "eng".to_string(),
            file_extension: "pdf".to_string(),
            max_workers: None,
            tika_url: "http://localhost:9998".to_string(),
            request_timeout_secs: 300,
            run_mode: RunMode::Auto,
            sequential_order: TraversalOrder::Reverse,
            auto_space: true,
            extract_inline_images: true,
            verbose_logging: false,
            report_file: None,
        }
    }
}

impl Config {
    /// 配置文件（`PDF_BATCH_CONFIG`，可选）+ 环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 加载完整配置：配置文件（可选）→ 环境变量 → 位置参数
    ///
    /// 位置参数依次为：输入目录、输出目录、OCR 语言
    pub fn load(args: &[String]) -> Result<Self, ConfigError> {
        Ok(Self::from_env()?.with_args(args))
    }

    /// 用查找函数覆盖字段（便于测试，不依赖进程环境）
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("INPUT_FOLDER") {
            self.input_folder = v;
        }
        if let Some(v) = lookup("OUTPUT_FOLDER") {
            self.output_folder = v;
        }
        if let Some(v) = lookup("OCR_LANGUAGE") {
            self.ocr_language = v;
        }
        if let Some(v) = lookup("FILE_EXTENSION") {
            self.file_extension = v;
        }
        if let Some(v) = lookup("TIKA_URL") {
            self.tika_url = v;
        }
        if let Some(v) = lookup("REPORT_FILE") {
            self.report_file = Some(v);
        }
        if let Some(v) = lookup("MAX_WORKERS") {
            self.max_workers = Some(parse_var("MAX_WORKERS", &v, "usize")?);
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("RUN_MODE") {
            self.run_mode = parse_var("RUN_MODE", &v, "RunMode")?;
        }
        if let Some(v) = lookup("SEQUENTIAL_ORDER") {
            self.sequential_order = parse_var("SEQUENTIAL_ORDER", &v, "TraversalOrder")?;
        }
        if let Some(v) = lookup("AUTO_SPACE") {
            self.auto_space = parse_var("AUTO_SPACE", &v, "bool")?;
        }
        if let Some(v) = lookup("EXTRACT_INLINE_IMAGES") {
            self.extract_inline_images = parse_var("EXTRACT_INLINE_IMAGES", &v, "bool")?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(self)
    }

    /// 用位置参数覆盖（空字符串视为未提供）
    pub fn with_args(mut self, args: &[String]) -> Self {
        let arg = |index: usize| {
            args.get(index)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(input) = arg(0) {
            self.input_folder = input;
        }
        if let Some(output) = arg(1) {
            self.output_folder = output;
        }
        if let Some(language) = arg(2) {
            self.ocr_language = language;
        }
        self
    }

    /// 构建整个运行期间不变的提取参数
    pub fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions::new(
            "application/pdf",
            self.ocr_language.clone(),
            self.auto_space,
            self.extract_inline_images,
        )
    }
}

fn parse_var<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config_and_options() {
        let config = Config::default();
        let options = config.extraction_options();

        assert_eq!(config.input_folder, "./pdf/");
        assert_eq!(config.output_folder, "./text/");
        assert_eq!(config.file_extension, "pdf");
        assert_eq!(config.sequential_order, TraversalOrder::Reverse);
        assert_eq!(options.content_type(), "application/pdf");
        assert_eq!(options.ocr_language(), "eng");
        assert!(options.auto_space());
        assert!(options.extract_inline_images());
    }

    #[test]
    fn test_overrides_parse_typed_values() {
        let config = Config::default()
            .with_overrides(lookup(&[
                ("MAX_WORKERS", "3"),
                ("RUN_MODE", "Sequential"),
                ("SEQUENTIAL_ORDER", "forward"),
                ("AUTO_SPACE", "false"),
                ("OCR_LANGUAGE", "deu"),
            ]))
            .unwrap();

        assert_eq!(config.max_workers, Some(3));
        assert_eq!(config.run_mode, RunMode::Sequential);
        assert_eq!(config.sequential_order, TraversalOrder::Forward);
        assert!(!config.auto_space);
        assert_eq!(config.ocr_language, "deu");
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let err = Config::default()
            .with_overrides(lookup(&[("MAX_WORKERS", "many")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "MAX_WORKERS"));
    }

    #[test]
    fn test_positional_args_override_in_order() {
        let args = vec!["in".to_string(), "".to_string(), "fra".to_string()];
        let config = Config::default().with_args(&args);

        // 空参数保留默认值
        assert_eq!(config.input_folder, "in");
        assert_eq!(config.output_folder, "./text/");
        assert_eq!(config.ocr_language, "fra");

        let config = Config::default().with_args(&["a".into(), "b".into(), "deu".into()]);
        assert_eq!(config.output_folder, "b");
        assert_eq!(config.ocr_language, "deu");
    }

    #[test]
    fn test_load_applies_positional_args_last() {
        let config = Config::load(&["in".into(), "out".into()]).unwrap();
        assert_eq!(config.input_folder, "in");
        assert_eq!(config.output_folder, "out");
    }

    #[test]
    fn test_from_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.toml");
        std::fs::write(
            &path,
            "input_folder = \"/data/pdf\"\nmax_workers = 2\nrun_mode = \"parallel\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.input_folder, "/data/pdf");
        assert_eq!(config.max_workers, Some(2));
        assert_eq!(config.run_mode, RunMode::Parallel);
        assert_eq!(config.output_folder, "./text/");
    }

    #[test]
    fn test_from_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "max_workers = \"two\"").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::TomlParseFailed { .. })
        ));
    }
}
