//! Index-ordered batch execution for the three evaluation modes.

use rayon::prelude::*;

use crate::schema::EvaluationMode;

use super::OptimizerError;

/// Runs independent tasks over a batch and gathers results by submission
/// index, never by completion order.
#[derive(Debug)]
pub struct BatchExecutor {
    mode: EvaluationMode,
    workers: usize,
    pool: Option<rayon::ThreadPool>,
}

impl BatchExecutor {
    /// Create an executor. `workers` defaults to the host's parallelism.
    pub fn new(mode: EvaluationMode, workers: Option<usize>) -> Result<Self, OptimizerError> {
        let workers = workers.unwrap_or_else(default_workers).max(1);

        let pool = match mode {
            EvaluationMode::Thread => Some(build_pool(workers, "metasearch-eval")?),
            // Separate pool whose workers each take one contiguous chunk.
            EvaluationMode::Process => Some(build_pool(workers, "metasearch-worker")?),
            EvaluationMode::Sequential => None,
        };

        Ok(Self {
            mode,
            workers,
            pool,
        })
    }

    /// Executor that runs everything on the calling thread.
    pub fn sequential() -> Self {
        Self {
            mode: EvaluationMode::Sequential,
            workers: 1,
            pool: None,
        }
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `f(index, item)` to every item; `result[i]` belongs to `items[i]`.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(usize, &T) -> R + Sync,
    {
        match (self.mode, &self.pool) {
            (EvaluationMode::Thread, Some(pool)) => pool.install(|| {
                items
                    .par_iter()
                    .enumerate()
                    .map(|(i, item)| f(i, item))
                    .collect()
            }),
            (EvaluationMode::Process, Some(pool)) if items.len() > 1 => {
                map_chunked(pool, self.workers, items, &f)
            }
            _ => items.iter().enumerate().map(|(i, item)| f(i, item)).collect(),
        }
    }
}

fn build_pool(workers: usize, prefix: &'static str) -> Result<rayon::ThreadPool, OptimizerError> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(move |i| format!("{}-{}", prefix, i))
        .build()?)
}

/// Split the batch into one contiguous chunk per worker and run each chunk
/// as a single task on `pool`; chunks are rejoined in order.
fn map_chunked<T, R, F>(pool: &rayon::ThreadPool, workers: usize, items: &[T], f: &F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    let chunk_size = items.len().div_ceil(workers);

    let chunks: Vec<Vec<R>> = pool.install(|| {
        items
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(c, chunk)| {
                let offset = c * chunk_size;
                chunk
                    .iter()
                    .enumerate()
                    .map(|(k, item)| f(offset + k, item))
                    .collect::<Vec<R>>()
            })
            .collect()
    });
    chunks.into_iter().flatten().collect()
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_all(executor: &BatchExecutor) -> Vec<(usize, u64)> {
        let items: Vec<u64> = (0..37).collect();
        executor.map(&items, |i, &x| {
            // Uneven work so completion order differs from submission order.
            if x % 3 == 0 {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            (i, x * x)
        })
    }

    #[test]
    fn test_all_modes_preserve_order() {
        let expected: Vec<(usize, u64)> = (0..37u64).map(|x| (x as usize, x * x)).collect();

        for mode in [
            EvaluationMode::Sequential,
            EvaluationMode::Thread,
            EvaluationMode::Process,
        ] {
            let executor = BatchExecutor::new(mode, Some(4)).unwrap();
            assert_eq!(executor.mode(), mode);
            assert_eq!(square_all(&executor), expected, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_process_mode_runs_contiguous_chunks_on_pool() {
        let executor = BatchExecutor::new(EvaluationMode::Process, Some(4)).unwrap();
        let items: Vec<u32> = (0..37).collect();
        let names = executor.map(&items, |_, _| {
            std::thread::current().name().unwrap_or_default().to_string()
        });

        assert!(names.iter().all(|n| n.starts_with("metasearch-worker-")));
        // ceil(37 / 4) = 10 items per chunk, each chunk on a single worker.
        for chunk in names.chunks(10) {
            assert!(chunk.iter().all(|n| n == &chunk[0]));
        }

        // The pool is reused across batches.
        let again = executor.map(&items, |_, _| {
            std::thread::current().name().unwrap_or_default().to_string()
        });
        assert!(again.iter().all(|n| n.starts_with("metasearch-worker-")));
    }

    #[test]
    fn test_more_workers_than_items() {
        let executor = BatchExecutor::new(EvaluationMode::Process, Some(16)).unwrap();
        let out = executor.map(&[1, 2, 3], |_, &x| x + 1);
        assert_eq!(out, vec![2, 3, 4]);
    }

    #[test]
    fn test_empty_batch() {
        let executor = BatchExecutor::new(EvaluationMode::Thread, Some(2)).unwrap();
        let out: Vec<i32> = executor.map(&[] as &[i32], |_, &x| x);
        assert!(out.is_empty());
        assert!(BatchExecutor::sequential().map(&[] as &[i32], |_, &x| x).is_empty());
    }
}
