//! Bounded enumeration of small simple cycles.
//!
//! Every simple cycle up to `max_size` atoms is reported exactly once as a
//! closed walk (`first == last`). The search is exponential in the worst
//! case, so it carries a wall-clock timeout and a cycle cap; callers that
//! can live without rings use [`RingSearch::find_cycles_or_empty`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::*;

use crate::AdjacencyList;

/// How often (in DFS steps) the clock is consulted.
const CLOCK_INTERVAL: u32 = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingSearchError {
    #[error("ring search exceeded its {0:?} timeout")]
    Timeout(Duration),
    #[error("ring search found more than {0} cycles")]
    TooManyCycles(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSearch {
    pub max_size: usize,
    pub timeout: Duration,
    pub max_cycles: usize,
}

impl Default for RingSearch {
    fn default() -> Self {
        Self {
            max_size: 6,
            timeout: Duration::from_secs(5),
            max_cycles: 100_000,
        }
    }
}

struct Search<'a> {
    adjacency: &'a AdjacencyList,
    in_ring_system: &'a [bool],
    config: &'a RingSearch,
    started: Instant,
    steps: u32,
    on_path: Vec<bool>,
    path: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl Search<'_> {
    fn tick(&mut self) -> Result<(), RingSearchError> {
        self.steps += 1;
        if self.steps % CLOCK_INTERVAL == 0 && self.started.elapsed() >= self.config.timeout {
            return Err(RingSearchError::Timeout(self.config.timeout));
        }
        Ok(())
    }

    fn extend(&mut self, start: usize, atom: usize) -> Result<(), RingSearchError> {
        self.tick()?;
        for &next in self.adjacency.neighbors(atom) {
            if next == start && self.path.len() >= 3 && self.path[1] < atom {
                // each cycle is seen in both directions; keep one
                let mut walk = self.path.clone();
                walk.push(start);
                self.cycles.push(walk);
                if self.cycles.len() > self.config.max_cycles {
                    return Err(RingSearchError::TooManyCycles(self.config.max_cycles));
                }
                continue;
            }
            if next <= start
                || self.on_path[next]
                || !self.in_ring_system[next]
                || self.path.len() >= self.config.max_size
            {
                continue;
            }
            self.on_path[next] = true;
            self.path.push(next);
            self.extend(start, next)?;
            self.path.pop();
            self.on_path[next] = false;
        }
        Ok(())
    }
}

/// Atoms left after repeatedly stripping atoms with fewer than two
/// remaining neighbours. Only these can sit on a cycle.
fn ring_system_atoms(adjacency: &AdjacencyList) -> Vec<bool> {
    let n = adjacency.len();
    let mut degree: Vec<usize> = (0..n).map(|a| adjacency.degree(a)).collect();
    let mut removed = vec![false; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&a| degree[a] <= 1).collect();

    while let Some(atom) = queue.pop_front() {
        if removed[atom] {
            continue;
        }
        removed[atom] = true;
        for &nbr in adjacency.neighbors(atom) {
            if !removed[nbr] {
                degree[nbr] -= 1;
                if degree[nbr] <= 1 {
                    queue.push_back(nbr);
                }
            }
        }
    }
    removed.into_iter().map(|r| !r).collect()
}

impl RingSearch {
    pub fn new(max_size: usize, timeout: Duration) -> Self {
        Self {
            max_size,
            timeout,
            ..Self::default()
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Every simple cycle of at most `max_size` atoms, as closed walks
    /// starting from the cycle's lowest atom index.
    pub fn find_cycles(&self, adjacency: &AdjacencyList) -> Result<Vec<Vec<usize>>, RingSearchError> {
        let in_ring_system = ring_system_atoms(adjacency);
        let mut search = Search {
            adjacency,
            in_ring_system: &in_ring_system,
            config: self,
            started: Instant::now(),
            steps: 0,
            on_path: vec![false; adjacency.len()],
            path: Vec::with_capacity(self.max_size + 1),
            cycles: Vec::new(),
        };

        if self.timeout.is_zero() && in_ring_system.iter().any(|&r| r) {
            return Err(RingSearchError::Timeout(self.timeout));
        }

        for start in 0..adjacency.len() {
            if !in_ring_system[start] {
                continue;
            }
            search.on_path[start] = true;
            search.path.push(start);
            let result = search.extend(start, start);
            search.path.clear();
            search.on_path[start] = false;
            result?;
        }

        debug!("found {} cycle(s) of up to {} atoms", search.cycles.len(), self.max_size);
        Ok(search.cycles)
    }

    /// Like [`RingSearch::find_cycles`], but an intractable search yields no
    /// rings instead of an error.
    pub fn find_cycles_or_empty(&self, adjacency: &AdjacencyList) -> Vec<Vec<usize>> {
        match self.find_cycles(adjacency) {
            Ok(cycles) => cycles,
            Err(err) => {
                warn!("{}; continuing without rings", err);
                Vec::new()
            }
        }
    }
}

/// The `(u, v)` atom pairs a closed walk steps over.
pub fn walk_edges(walk: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    walk.windows(2).map(|w| (w[0], w[1]))
}
