//! Weighted tasks

use crate::request::RequestSpec;
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;

/// Builds the request for one task execution
pub type RequestBuilder<S> = fn(&S, &mut StdRng) -> RequestSpec;

/// One kind of action a simulated user performs
pub struct Task<S> {
    pub name: &'static str,
    /// Relative weight; a task with weight 0 is never picked
    pub weight: u32,
    pub build: RequestBuilder<S>,
}

impl<S> Task<S> {
    pub fn new(name: &'static str, weight: u32, build: RequestBuilder<S>) -> Self {
        Self {
            name,
            weight,
            build,
        }
    }
}

impl<S> Clone for Task<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            weight: self.weight,
            build: self.build,
        }
    }
}

impl<S> fmt::Debug for Task<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// The tasks of a scenario and their ratios
pub struct TaskSet<S> {
    tasks: Vec<Task<S>>,
}

impl<S> TaskSet<S> {
    pub fn new(tasks: Vec<Task<S>>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task<S>] {
        &self.tasks
    }

    pub fn total_weight(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.weight)).sum()
    }

    /// Pick a task with probability weight / total weight
    ///
    /// Returns `None` when no task has a positive weight.
    pub fn pick(&self, rng: &mut StdRng) -> Option<&Task<S>> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }

        let mut roll = rng.random_range(0..total);
        for task in &self.tasks {
            let weight = u64::from(task.weight);
            if roll < weight {
                return Some(task);
            }
            roll -= weight;
        }
        None
    }

    /// Names and weights, in declaration order
    pub fn weights(&self) -> Vec<(&'static str, u32)> {
        self.tasks.iter().map(|t| (t.name, t.weight)).collect()
    }
}

impl<S> Clone for TaskSet<S> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
        }
    }
}

impl<S> fmt::Debug for TaskSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.tasks).finish()
    }
}
