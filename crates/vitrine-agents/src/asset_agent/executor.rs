// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Where fetch and decode jobs run.

use crossbeam_channel::{unbounded, Sender};
use std::io;
use std::thread::{self, JoinHandle};

/// A unit of fetch-and-decode work. It reports its own result on a channel.
pub type LoadJob = Box<dyn FnOnce() + Send + 'static>;

/// Runs load jobs somewhere off the evaluation path.
pub trait LoadExecutor: Send {
    /// Queues `job` for execution.
    fn spawn(&self, job: LoadJob);

    /// A short name for logs.
    fn name(&self) -> &'static str;
}

/// Runs each job immediately on the calling thread.
///
/// The job's completion still travels through the agent's channel, so the
/// requester observes it on the next [`poll_completions`](super::AssetAgent::poll_completions),
/// never synchronously.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl LoadExecutor for InlineExecutor {
    fn spawn(&self, job: LoadJob) {
        job();
    }

    fn name(&self) -> &'static str {
        "Inline"
    }
}

/// A fixed pool of OS threads fed from a shared queue.
///
/// Dropping the pool closes the queue and joins every worker once the jobs
/// already queued have run.
pub struct WorkerPoolExecutor {
    sender: Option<Sender<LoadJob>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPoolExecutor {
    /// Starts `threads` workers (at least one).
    pub fn new(threads: usize) -> io::Result<Self> {
        let (sender, receiver) = unbounded::<LoadJob>();
        let mut workers = Vec::with_capacity(threads.max(1));
        for index in 0..threads.max(1) {
            let receiver = receiver.clone();
            let worker = thread::Builder::new()
                .name(format!("vitrine-decode-{index}"))
                .spawn(move || {
                    for job in receiver.iter() {
                        job();
                    }
                })?;
            workers.push(worker);
        }
        log::info!("WorkerPoolExecutor: Started {} decode workers.", workers.len());
        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads.
    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }
}

impl LoadExecutor for WorkerPoolExecutor {
    fn spawn(&self, job: LoadJob) {
        let Some(sender) = &self.sender else {
            log::error!("WorkerPoolExecutor: Job submitted after shutdown; dropped.");
            return;
        };
        if sender.send(job).is_err() {
            log::error!("WorkerPoolExecutor: All workers exited; job dropped.");
        }
    }

    fn name(&self) -> &'static str {
        "WorkerPool"
    }
}

impl Drop for WorkerPoolExecutor {
    fn drop(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("WorkerPoolExecutor: A decode worker panicked.");
            }
        }
    }
}
