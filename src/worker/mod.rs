//! Off-thread tree generation with progress and cancellation
//!
//! Full-tree generation is CPU-bound, so it runs on the blocking pool
//! while the caller awaits the handle. Progress events stream over an
//! unbounded channel after every completed generation, and a shared flag
//! cancels the run between generations.

use crate::cat::MutationPool;
use crate::error::{Result, TreeError};
use crate::tree::{FoundingCoupleInput, SerializedAncestryTree, TreeGenerationConfig, TreeManager};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Everything a generation job needs, owned so it can move to the
/// blocking pool.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub config: TreeGenerationConfig,
    pub founding_couple: FoundingCoupleInput,
    pub pool: MutationPool,
    pub tree_name: Option<String>,
    /// Fixed rng seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

/// Emitted after each completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationProgress {
    pub generation: u32,
    pub total_generations: u32,
    pub cat_count: usize,
}

pub struct GenerationHandle {
    pub progress: mpsc::UnboundedReceiver<GenerationProgress>,
    cancel: Arc<AtomicBool>,
    task: JoinHandle<Result<SerializedAncestryTree>>,
}

impl GenerationHandle {
    /// Request cancellation; the job stops before its next generation.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Wait for the job. Yields the finished tree, [`TreeError::Cancelled`]
    /// when the job noticed the flag, or [`TreeError::TaskFailed`] when the
    /// blocking task panicked.
    pub async fn join(self) -> Result<SerializedAncestryTree> {
        match self.task.await {
            Ok(result) => result,
            Err(join_error) => Err(TreeError::TaskFailed(join_error.to_string())),
        }
    }
}

/// Spawn a full-tree generation job on the blocking pool. Must be called
/// from within a tokio runtime.
pub fn spawn_generation(request: GenerationRequest) -> GenerationHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();

    let task = tokio::task::spawn_blocking(move || {
        run_generation_job(request, &flag, |progress| {
            // The receiver may have been dropped; the job still finishes.
            let _ = progress_tx.send(progress);
        })
    });

    GenerationHandle {
        progress: progress_rx,
        cancel,
        task,
    }
}

/// Synchronous driver behind [`spawn_generation`]. The cancel flag is
/// polled between generations, so in-flight generations always finish.
pub fn run_generation_job(
    request: GenerationRequest,
    cancel: &AtomicBool,
    mut on_progress: impl FnMut(GenerationProgress),
) -> Result<SerializedAncestryTree> {
    request.config.validate()?;
    let estimate = request.config.check_size()?;
    debug!("generation job starting, estimated {} cats", estimate.estimated);

    let mut manager = match request.seed {
        Some(seed) => TreeManager::seeded(request.pool, seed),
        None => TreeManager::new(request.pool),
    };
    manager.set_config(request.config)?;
    if let Some(name) = request.tree_name {
        manager.set_name(name);
    }
    manager.initialize_founding_couple(request.founding_couple)?;
    manager.prepare_for_full_tree()?;

    let total_generations = manager.tree().config.depth;
    for generation in 1..=total_generations {
        if cancel.load(Ordering::Relaxed) {
            info!("generation job cancelled before generation {generation}");
            return Err(TreeError::Cancelled);
        }
        manager.generate_generation(generation)?;
        on_progress(GenerationProgress {
            generation,
            total_generations,
            cat_count: manager.cat_count(),
        });
    }

    info!("generation job finished with {} cats", manager.cat_count());
    Ok(manager.serialize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat::CatParams;
    use crate::tree::FounderInput;

    fn sample_request(depth: u32, seed: u64) -> GenerationRequest {
        let params = CatParams {
            pelt_name: "Tabby".into(),
            colour: "GINGER".into(),
            eye_colour: "AMBER".into(),
            skin_colour: "PINK".into(),
            ..CatParams::default()
        };
        GenerationRequest {
            config: TreeGenerationConfig {
                depth,
                min_children: 1,
                max_children: 3,
                partner_chance: 0.7,
                ..TreeGenerationConfig::default()
            },
            founding_couple: FoundingCoupleInput {
                mother: FounderInput {
                    params: params.clone(),
                    name: None,
                    history_profile_id: None,
                },
                father: FounderInput {
                    params,
                    name: None,
                    history_profile_id: None,
                },
            },
            pool: MutationPool::standard(),
            tree_name: Some("Worker Tree".to_string()),
            seed: Some(seed),
        }
    }

    #[tokio::test]
    async fn test_spawn_generation_streams_progress() {
        let request = sample_request(3, 21);
        let mut handle = spawn_generation(request);

        let mut events = Vec::new();
        while let Some(progress) = handle.progress.recv().await {
            events.push(progress);
        }
        let tree = handle.join().await.unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].generation, 1);
        assert_eq!(events[2].generation, 3);
        assert!(events.windows(2).all(|w| w[0].cat_count <= w[1].cat_count));
        assert_eq!(tree.name, "Worker Tree");
        assert_eq!(
            tree.cats.len(),
            events.last().map(|e| e.cat_count).unwrap_or(0)
        );
    }

    #[test]
    fn test_pre_cancelled_job_stops_immediately() {
        let request = sample_request(3, 8);
        let cancel = AtomicBool::new(true);
        let mut events = Vec::new();
        let result = run_generation_job(request, &cancel, |p| events.push(p));
        assert!(matches!(result, Err(TreeError::Cancelled)));
        assert!(events.is_empty());
    }

    #[test]
    fn test_job_rejects_invalid_config() {
        let mut request = sample_request(2, 8);
        request.config.min_children = 10;
        request.config.max_children = 2;
        let cancel = AtomicBool::new(false);
        let result = run_generation_job(request, &cancel, |_| {});
        assert!(matches!(result, Err(TreeError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_cancel_mid_run_is_reported() {
        // A cancel raced against a short job either lands (Cancelled) or
        // the job finishes first; both must surface cleanly.
        let request = sample_request(2, 55);
        let handle = spawn_generation(request);
        handle.cancel();
        match handle.join().await {
            Ok(tree) => assert!(!tree.cats.is_empty()),
            Err(TreeError::Cancelled) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
