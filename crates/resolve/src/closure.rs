use std::collections::HashSet;
use tracing::instrument;

use crate::Context;
use crate::error::Result;

/// Every package discovered so far.
///
/// A name enters `visited` at the same moment it is appended to `all`, so
/// `all` never holds a duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureState {
    visited: HashSet<String>,
    all: Vec<String>,
}
impl ClosureState {
    pub fn contains(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Discovered packages, in breadth-first discovery order.
    pub fn packages(&self) -> &[String] {
        &self.all
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Returns `false` if the package was already known.
    fn insert(&mut self, name: &str) -> bool {
        if !self.visited.insert(name.to_string()) {
            return false;
        }
        self.all.push(name.to_string());
        true
    }
}

impl Context {
    /// Walks the dependency graph breadth-first from the seeds.
    ///
    /// The seeds form the first level. Each following level holds the
    /// packages first referenced by the previous level, in the order they are
    /// met; packages within a level are expanded in order and their
    /// dependencies in lexicographic order. Packages already discovered by an
    /// earlier call are not visited again.
    #[instrument(skip_all)]
    pub async fn build_closure<I, S>(&mut self, seeds: I) -> Result<&ClosureState>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut level: Vec<String> = Vec::new();
        for seed in seeds {
            let seed = seed.as_ref();
            if self.closure.insert(seed) {
                level.push(seed.to_string());
            }
        }
        let mut depth = 0;
        while !level.is_empty() {
            tracing::debug!(depth, packages = level.len(), "Expanding level");
            let mut next: Vec<String> = Vec::new();
            let mut queued: HashSet<String> = HashSet::new();
            for name in &level {
                for dependency in self.dependencies(name).await? {
                    if self.closure.contains(&dependency) || queued.contains(&dependency) {
                        continue;
                    }
                    queued.insert(dependency.clone());
                    next.push(dependency);
                }
            }
            for name in &next {
                self.closure.insert(name);
            }
            level = next;
            depth += 1;
        }
        tracing::info!(packages = self.closure.len(), depth, "Resolved dependency closure");
        Ok(&self.closure)
    }
}
