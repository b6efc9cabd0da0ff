//! 分区计算 - 编排层
//!
//! 计算 Worker 数量，并把文件列表一次性划分为互不重叠的批次

use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::models::{Batch, FileList, PartitionPlan};

/// 当前机器可用的并行度，无法获取时为 1
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// `min(parallelism, file_count)`，并行度至少按 1 计算
pub fn worker_count(parallelism: usize, file_count: usize) -> usize {
    parallelism.max(1).min(file_count)
}

/// 把文件列表划分为 `worker_count` 个批次
///
/// 轮询分配：第 i 个批次拿到第 `i, i+w, i+2w, ...` 个文件。
/// 每个文件恰好出现在一个批次中，批次内保持原有相对顺序，
/// 任意两个批次的大小相差不超过 1。
pub fn partition(files: &FileList, worker_count: usize) -> PartitionPlan {
    partition_by_key(files, worker_count, Path::to_path_buf)
}

/// 按 key 分区：key 相同的文件进入同一批次
///
/// 每个新 key 按轮询分配批次，重复 key 跟随第一次出现的批次，
/// 因此同一输出文件的写入在一个 Worker 内按顺序发生。
/// key 互不相同时结果与 [`partition`] 一致。
pub fn partition_by_key<K, F>(files: &FileList, worker_count: usize, key: F) -> PartitionPlan
where
    K: Eq + Hash,
    F: Fn(&Path) -> K,
{
    if worker_count == 0 {
        return PartitionPlan::default();
    }

    let mut buckets: Vec<Vec<PathBuf>> = vec![Vec::new(); worker_count];
    let mut assigned: HashMap<K, usize> = HashMap::new();
    let mut next = 0;

    for file in files.iter() {
        let slot = *assigned.entry(key(file)).or_insert_with(|| {
            let slot = next % worker_count;
            next += 1;
            slot
        });
        buckets[slot].push(file.to_path_buf());
    }

    let batches = buckets
        .into_iter()
        .enumerate()
        .map(|(i, files)| Batch::new(i + 1, files))
        .collect();

    PartitionPlan::from_batches(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn file_list(n: usize) -> FileList {
        FileList::new((0..n).map(|i| PathBuf::from(format!("/in/{:03}.pdf", i))))
    }

    #[test]
    fn test_worker_count_is_bounded_by_files() {
        assert_eq!(worker_count(8, 3), 3);
        assert_eq!(worker_count(2, 3), 2);
        assert_eq!(worker_count(4, 0), 0);
        assert_eq!(worker_count(0, 5), 1);
    }

    #[test]
    fn test_partition_is_total_and_balanced() {
        for n in 0..40 {
            for parallelism in 1..10 {
                let files = file_list(n);
                let count = worker_count(parallelism, n);
                let plan = partition(&files, count);

                assert_eq!(plan.worker_count(), count);
                assert_eq!(plan.file_count(), n);

                let mut seen = HashSet::new();
                for batch in plan.batches() {
                    for file in &batch.files {
                        assert!(seen.insert(file.clone()), "duplicate {:?}", file);
                    }
                }
                assert_eq!(seen.len(), n);

                let sizes: Vec<usize> = plan.batches().iter().map(Batch::len).collect();
                if let (Some(max), Some(min)) = (sizes.iter().max(), sizes.iter().min()) {
                    assert!(max - min <= 1, "unbalanced sizes {:?}", sizes);
                }
            }
        }
    }

    #[test]
    fn test_partition_preserves_relative_order() {
        let files = file_list(7);
        let plan = partition(&files, 3);

        let position = |p: &PathBuf| files.as_slice().iter().position(|f| f == p).unwrap();
        for batch in plan.batches() {
            let positions: Vec<usize> = batch.files.iter().map(position).collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(
            plan.batches()[0].files,
            vec![
                PathBuf::from("/in/000.pdf"),
                PathBuf::from("/in/003.pdf"),
                PathBuf::from("/in/006.pdf")
            ]
        );
    }

    #[test]
    fn test_three_files_two_workers() {
        let files = FileList::new(vec![
            PathBuf::from("/in/a.pdf"),
            PathBuf::from("/in/b.pdf"),
            PathBuf::from("/in/c.pdf"),
        ]);
        let plan = partition(&files, worker_count(2, files.len()));

        let sizes: Vec<usize> = plan.batches().iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![2, 1]);
        let ids: Vec<usize> = plan.batches().iter().map(|b| b.worker_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_more_workers_than_files_gives_empty_batches() {
        let plan = partition(&file_list(2), 4);
        let sizes: Vec<usize> = plan.batches().iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_same_key_lands_in_one_batch() {
        let files = FileList::new(vec![
            PathBuf::from("/in/foo/a.pdf"),
            PathBuf::from("/in/b.pdf"),
            PathBuf::from("/in/bar/a.pdf"),
            PathBuf::from("/in/c.pdf"),
        ]);
        let plan = partition_by_key(&files, 2, |p| p.file_name().map(|n| n.to_os_string()));

        assert_eq!(plan.file_count(), 4);
        assert_eq!(
            plan.batches()[0].files,
            vec![
                PathBuf::from("/in/foo/a.pdf"),
                PathBuf::from("/in/bar/a.pdf"),
                PathBuf::from("/in/c.pdf")
            ]
        );
        assert_eq!(plan.batches()[1].files, vec![PathBuf::from("/in/b.pdf")]);
    }

    #[test]
    fn test_available_parallelism_is_positive() {
        assert!(available_parallelism() >= 1);
    }
}
