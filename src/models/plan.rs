//! 文件列表与分区计划

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 待处理文件列表
///
/// 按发现顺序排列，去重，计算完成后不可修改。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    files: Vec<PathBuf>,
}

impl FileList {
    /// 创建文件列表，重复路径只保留第一次出现的位置
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut seen = HashSet::new();
        let files = paths
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Path> + ExactSizeIterator {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }
}

/// 单个 Worker 独占的文件批次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Worker 编号（从 1 开始）
    pub worker_id: usize,
    pub files: Vec<PathBuf>,
}

impl Batch {
    pub fn new(worker_id: usize, files: Vec<PathBuf>) -> Self {
        Self { worker_id, files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// 分区计划：每个 Worker 一个批次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionPlan {
    batches: Vec<Batch>,
}

impl PartitionPlan {
    pub(crate) fn from_batches(batches: Vec<Batch>) -> Self {
        Self { batches }
    }

    pub fn worker_count(&self) -> usize {
        self.batches.len()
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// 所有批次的文件总数
    pub fn file_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    pub fn into_batches(self) -> Vec<Batch> {
        self.batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_list_dedup_keeps_first_position() {
        let list = FileList::new(vec![
            PathBuf::from("/in/a.pdf"),
            PathBuf::from("/in/b.pdf"),
            PathBuf::from("/in/a.pdf"),
            PathBuf::from("/in/c.pdf"),
        ]);

        let names: Vec<_> = list.iter().map(|p| p.to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["/in/a.pdf", "/in/b.pdf", "/in/c.pdf"]);
    }
}
