//! 提取参数

/// 文本提取参数
///
/// 启动时构建一次，通过 `Arc` 共享给所有 Worker，运行期间不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    content_type: String,
    ocr_language: String,
    auto_space: bool,
    extract_inline_images: bool,
}

impl ExtractionOptions {
    pub fn new(
        content_type: impl Into<String>,
        ocr_language: impl Into<String>,
        auto_space: bool,
        extract_inline_images: bool,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            ocr_language: ocr_language.into(),
            auto_space,
            extract_inline_images,
        }
    }

    /// 文档 MIME 类型
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// OCR 语言代码（如 `eng`、`deu`）
    pub fn ocr_language(&self) -> &str {
        &self.ocr_language
    }

    pub fn auto_space(&self) -> bool {
        self.auto_space
    }

    pub fn extract_inline_images(&self) -> bool {
        self.extract_inline_images
    }
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self::new("application/pdf", "eng", true, true)
    }
}
