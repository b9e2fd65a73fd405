//! Module implementing random synaptic connectivity between two neuron populations.
//!
//! Every ordered (pre, post) pair is connected independently with probability `epsilon`.
//! Synapses are identified by positive integers assigned in row-major scan order, and
//! the lookup table holds 0 where there is no synapse.
//!
//! # Examples
//!
//! ```
//! use dbs_inputs::connectivity::SynapticConnectivity;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let connectivity = SynapticConnectivity::rand(3, 4, 1.0, &mut rng);
//!
//! assert_eq!(connectivity.count(), 12);
//! assert_eq!(connectivity.synapse_id(1, 0), Some(5));
//! ```

use itertools::iproduct;
use log::debug;
use nalgebra::DMatrix;
use rand::Rng;

/// Represents the synaptic connections from a pre-synaptic to a post-synaptic population.
#[derive(Debug, PartialEq, Clone)]
pub struct SynapticConnectivity {
    /// The lookup table, `lut[(pre, post)]` is the synapse ID or 0 if there is none.
    lut: DMatrix<usize>,
    /// The number of synapses.
    count: usize,
}

impl SynapticConnectivity {
    /// Sample a random connectivity between `num_pre` and `num_post` neurons.
    ///
    /// One uniform draw in [0, 1) is consumed per pair, in row-major order, and the pair is
    /// connected if the draw does not exceed `epsilon`. The probability is not validated:
    /// a negative value never connects and a value above one always does.
    pub fn rand<R: Rng>(num_pre: usize, num_post: usize, epsilon: f64, rng: &mut R) -> Self {
        let mut lut = DMatrix::<usize>::zeros(num_pre, num_post);
        let mut count = 0;

        for (i, j) in iproduct!(0..num_pre, 0..num_post) {
            if rng.gen::<f64>() <= epsilon {
                count += 1;
                lut[(i, j)] = count;
            }
        }

        debug!(
            "Sampled {} synapses between {} pre- and {} post-synaptic neurons (epsilon={})",
            count, num_pre, num_post, epsilon
        );

        SynapticConnectivity { lut, count }
    }

    /// Returns the number of pre-synaptic neurons.
    pub fn num_pre(&self) -> usize {
        self.lut.nrows()
    }

    /// Returns the number of post-synaptic neurons.
    pub fn num_post(&self) -> usize {
        self.lut.ncols()
    }

    /// Returns the number of synapses.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the lookup table.
    pub fn lut(&self) -> &DMatrix<usize> {
        &self.lut
    }

    /// Returns the ID of the synapse from `pre` to `post`.
    /// Returns None if the neurons are not connected or out of bounds.
    pub fn synapse_id(&self, pre: usize, post: usize) -> Option<usize> {
        match self.lut.get((pre, post)) {
            Some(&id) if id > 0 => Some(id),
            _ => None,
        }
    }

    /// Returns true if there is a synapse from `pre` to `post`.
    pub fn is_connected(&self, pre: usize, post: usize) -> bool {
        self.synapse_id(pre, post).is_some()
    }

    /// Returns an iterator over the synapses as (pre, post, id) triplets, sorted by ID.
    pub fn synapses(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        iproduct!(0..self.num_pre(), 0..self.num_post())
            .filter_map(move |(i, j)| self.synapse_id(i, j).map(|id| (i, j, id)))
    }

    /// Returns the fraction of connected pairs, or 0 for an empty population.
    pub fn density(&self) -> f64 {
        let num_pairs = self.lut.len();
        if num_pairs == 0 {
            return 0.0;
        }
        self.count as f64 / num_pairs as f64
    }

    /// Returns the number of synapses leaving the pre-synaptic neuron `pre`.
    pub fn out_degree(&self, pre: usize) -> usize {
        if pre >= self.num_pre() {
            return 0;
        }
        self.lut.row(pre).iter().filter(|&&id| id > 0).count()
    }

    /// Returns the number of synapses reaching the post-synaptic neuron `post`.
    pub fn in_degree(&self, post: usize) -> usize {
        if post >= self.num_post() {
            return 0;
        }
        self.lut.column(post).iter().filter(|&&id| id > 0).count()
    }
}
