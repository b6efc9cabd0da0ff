//! Tika 提取客户端 - 业务能力层
//!
//! 通过 Apache Tika Server 的 `PUT /tika` 接口提取 PDF 文本，OCR 参数以请求头传递

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::Config;
use crate::error::ExtractError;
use crate::models::ExtractionOptions;
use crate::services::extraction::{BoxedExtractor, ExtractionService, ExtractorFactory};
use crate::utils::logging::truncate_text;

const OCR_LANGUAGE_HEADER: &str = "X-Tika-OCRLanguage";
const AUTO_SPACE_HEADER: &str = "X-Tika-PDFenableAutoSpace";
const INLINE_IMAGES_HEADER: &str = "X-Tika-PDFextractInlineImages";

/// Tika 客户端
///
/// 每个 Worker 持有自己的实例（独立连接池）。
pub struct TikaClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TikaClient {
    /// 创建新的 Tika 客户端
    ///
    /// # 参数
    /// - `base_url`: Tika 服务地址，如 `http://localhost:9998`
    /// - `timeout`: 单个请求超时
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: tika_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 请求未得到响应：超时只影响当前文件，连接失败等视为服务不可达
    fn send_error(&self, path: &Path, err: reqwest::Error) -> ExtractError {
        if err.is_timeout() {
            return ExtractError::Timeout {
                path: path.to_path_buf(),
            };
        }
        ExtractError::Unavailable {
            endpoint: self.endpoint.clone(),
            message: err.to_string(),
        }
    }
}

/// 已收到响应但读取响应体失败，只影响当前文件
fn body_error(path: &Path, status: StatusCode, err: reqwest::Error) -> ExtractError {
    if err.is_timeout() {
        return ExtractError::Timeout {
            path: path.to_path_buf(),
        };
    }
    ExtractError::Rejected {
        path: path.to_path_buf(),
        status: status.as_u16(),
        message: format!("读取响应失败: {}", err),
    }
}

/// `<base_url>/tika`
fn tika_endpoint(base_url: &str) -> String {
    format!("{}/tika", base_url.trim_end_matches('/'))
}

/// 网关类状态码说明服务本身不可用，而不是某个文件有问题
fn is_service_unavailable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

#[async_trait]
impl ExtractionService for TikaClient {
    async fn extract(&self, path: &Path, options: &ExtractionOptions) -> Result<String, ExtractError> {
        let body = tokio::fs::read(path).await.map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "调用 Tika: {} ({} 字节, 语言: {})",
            path.display(),
            body.len(),
            options.ocr_language()
        );

        let response = self
            .client
            .put(&self.endpoint)
            .header(CONTENT_TYPE, options.content_type())
            .header(ACCEPT, "text/plain")
            .header(OCR_LANGUAGE_HEADER, options.ocr_language())
            .header(AUTO_SPACE_HEADER, options.auto_space().to_string())
            .header(INLINE_IMAGES_HEADER, options.extract_inline_images().to_string())
            .body(body)
            .send()
            .await
            .map_err(|e| self.send_error(path, e))?;

        let status = response.status();
        if is_service_unavailable(status) {
            return Err(ExtractError::Unavailable {
                endpoint: self.endpoint.clone(),
                message: format!("状态码 {}", status.as_u16()),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractError::Rejected {
                path: path.to_path_buf(),
                status: status.as_u16(),
                message: truncate_text(message.trim(), 200),
            });
        }

        response
            .text()
            .await
            .map_err(|e| body_error(path, status, e))
    }
}

/// 为每个 Worker 创建独立的 [`TikaClient`]
#[derive(Debug, Clone)]
pub struct TikaClientFactory {
    base_url: String,
    timeout: Duration,
}

impl TikaClientFactory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tika_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

impl ExtractorFactory for TikaClientFactory {
    fn create(&self, worker_id: usize) -> Result<BoxedExtractor, ExtractError> {
        let client = TikaClient::new(&self.base_url, self.timeout)?;
        debug!("Worker {} 使用 Tika 端点 {}", worker_id, client.endpoint());
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(tika_endpoint("http://localhost:9998/"), "http://localhost:9998/tika");
        assert_eq!(tika_endpoint("http://tika:9998"), "http://tika:9998/tika");
    }

    #[test]
    fn test_gateway_statuses_are_service_level() {
        assert!(is_service_unavailable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_service_unavailable(StatusCode::BAD_GATEWAY));
        assert!(!is_service_unavailable(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!is_service_unavailable(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_missing_file_is_per_file_error() {
        let client = TikaClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let err = client
            .extract(Path::new("/definitely/not/here.pdf"), &ExtractionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Io { .. }));
        assert!(!err.is_batch_fatal());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_batch_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let client = TikaClient::new("http://127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let err = client
            .extract(&pdf, &ExtractionOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_batch_fatal(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_truncated_response_body_is_per_file_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // 读完请求体再响应
            while !request.windows(8).any(|w| w == b"%PDF-1.4") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 100\r\n\r\npartial")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let client = TikaClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        let err = client
            .extract(&pdf, &ExtractionOptions::default())
            .await
            .unwrap_err();

        assert!(!err.is_batch_fatal(), "unexpected error: {err}");
        assert!(matches!(err, ExtractError::Rejected { status: 200, .. }));
    }

    /// 需要本地运行 Tika Server：
    /// ```bash
    /// docker run -p 9998:9998 apache/tika:latest-full
    /// TIKA_TEST_PDF=/path/to/file.pdf cargo test test_live_tika -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_tika() {
        let _ = tracing_subscriber::fmt::try_init();

        let pdf = std::env::var("TIKA_TEST_PDF").expect("需要设置 TIKA_TEST_PDF");
        let client = TikaClient::new("http://localhost:9998", Duration::from_secs(120)).unwrap();

        let text = client
            .extract(Path::new(&pdf), &ExtractionOptions::default())
            .await
            .unwrap();

        println!("{}", truncate_text(&text, 500));
        assert!(!text.trim().is_empty());
    }
}
