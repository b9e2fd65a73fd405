//! This crate provides the inputs of a network simulation of deep-brain stimulation (DBS).
//!
//! # Sampling Connectivity
//!
//! ```rust
//! use dbs_inputs::config::SimulationConfig;
//! use dbs_inputs::connectivity::SynapticConnectivity;
//!
//! // A seeded configuration makes the connectivity reproducible
//! let config = SimulationConfig::build(1000.0, 0.1, 20.0, Some(42)).unwrap();
//! let mut rng = config.rng();
//!
//! // Connect 100 excitatory to 50 inhibitory neurons with probability 0.1
//! let connectivity = SynapticConnectivity::rand(100, 50, 0.1, &mut rng);
//!
//! assert_eq!(connectivity.lut().shape(), (100, 50));
//! assert_eq!(connectivity.synapses().count(), connectivity.count());
//! ```
//!
//! # Generating Stimulation
//!
//! ```rust
//! use dbs_inputs::config::SimulationConfig;
//! use dbs_inputs::pulse::PulseShape;
//!
//! let config = SimulationConfig::default();
//!
//! // Asymmetric biphasic pulse with a neutral phase of twice the pulse width
//! let shape = PulseShape::build(2.0, 1.0, 0.5, 2.0).unwrap();
//! let (ue, ui) = shape.waveform(&config).into_parts();
//!
//! assert_eq!(ue.len(), config.num_steps());
//! assert_eq!(ui.len(), config.num_steps());
//! ```

pub mod config;
pub mod connectivity;
pub mod error;
pub mod pulse;

/// The distance to the end of a pulse cycle below which the local clock restarts.
/// It does not scale with the step size, so a coarse grid may restart a cycle early.
pub const RESET_TOLERANCE: f64 = 0.01;
