#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pdf_text_batch::{BoxedExtractor, ExtractError, ExtractionOptions, ExtractionService, ExtractorFactory};

/// 确定性的桩提取服务：返回 `<prefix><文件名>`，
/// `qualified` 时返回 `<prefix><上级目录>/<文件名>`
pub struct StubExtractor {
    pub prefix: String,
    pub qualified: bool,
    pub fail_on: Vec<String>,
    pub calls: Mutex<Vec<String>>,
    pub languages: Mutex<Vec<String>>,
}

impl StubExtractor {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            qualified: false,
            fail_on: Vec::new(),
            calls: Mutex::new(Vec::new()),
            languages: Mutex::new(Vec::new()),
        }
    }

    pub fn qualified(mut self) -> Self {
        self.qualified = true;
        self
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on.push(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionService for StubExtractor {
    async fn extract(&self, path: &Path, options: &ExtractionOptions) -> Result<String, ExtractError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.calls.lock().unwrap().push(name.clone());
        self.languages
            .lock()
            .unwrap()
            .push(options.ocr_language().to_string());

        if self.fail_on.contains(&name) {
            return Err(ExtractError::Rejected {
                path: path.to_path_buf(),
                status: 500,
                message: "stub failure".to_string(),
            });
        }
        if self.qualified {
            let parent = path
                .parent()
                .and_then(|p| p.file_name())
                .unwrap()
                .to_string_lossy()
                .to_string();
            return Ok(format!("{}{}/{}", self.prefix, parent, name));
        }
        Ok(format!("{}{}", self.prefix, name))
    }
}

/// 指定 Worker 启动失败的工厂
pub struct FailingFactory {
    pub inner: Arc<StubExtractor>,
    pub fail_worker: usize,
}

impl ExtractorFactory for FailingFactory {
    fn create(&self, worker_id: usize) -> Result<BoxedExtractor, ExtractError> {
        if worker_id == self.fail_worker {
            return Err(ExtractError::ClientSetup("stub setup failure".to_string()));
        }
        Ok(self.inner.clone())
    }
}

pub fn shared(extractor: &Arc<StubExtractor>) -> Arc<dyn ExtractorFactory> {
    let boxed: BoxedExtractor = extractor.clone();
    Arc::new(boxed)
}

/// 在目录下创建若干个假 PDF
pub fn create_pdfs(dir: &Path, names: &[&str]) {
    for name in names {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"%PDF-1.4").unwrap();
    }
}

/// 输出目录中的文件名（排序后）
pub fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

pub fn read(path: PathBuf) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// 捕获日志输出的缓冲区
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
