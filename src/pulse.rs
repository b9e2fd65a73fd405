//! Module implementing biphasic pulsatile stimulation inputs.
//!
//! A stimulation produces two current traces sampled on the simulation grid: `ue` drives the
//! excitatory population and `ui` the inhibitory one. Each trace repeats a cycle made of
//! anodic (negative), cathodic (positive) and neutral phases, and its local clock restarts
//! as soon as it comes within [`RESET_TOLERANCE`] of the end of the cycle.
//!
//! # Examples
//!
//! ```
//! use dbs_inputs::pulse::{PulseShape, StimulusWaveform};
//!
//! let shape = PulseShape::build(1.0, 1.0, 1.0, 1.0).unwrap();
//! let waveform = StimulusWaveform::build(&shape, 10.0, 0.1);
//!
//! assert_eq!(waveform.len(), 100);
//! assert_eq!(waveform.ue()[0], -1.0);
//! assert_eq!(waveform.ui()[0], 1.0);
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::config::SimulationConfig;
use super::error::DBSError;
use super::RESET_TOLERANCE;

/// Represents the shape of a biphasic stimulation pulse.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct PulseShape {
    /// Relative duration of the anodic and cathodic phases (symmetric at 1, asymmetric above).
    pub multi: f64,
    /// Stimulation amplitude.
    pub v_stim: f64,
    /// Pulse width.
    pub t_stim: f64,
    /// Duration of the neutral phase, in units of the pulse width.
    pub x: f64,
}

impl PulseShape {
    /// Create a new pulse shape without any check.
    /// A zero `multi` makes the anodic amplitude infinite.
    pub fn new(multi: f64, v_stim: f64, t_stim: f64, x: f64) -> Self {
        PulseShape {
            multi,
            v_stim,
            t_stim,
            x,
        }
    }

    /// Create a new pulse shape with the specified parameters.
    /// Returns an error if a parameter is not finite, if `multi` or `t_stim` is not positive,
    /// or if `x` is negative.
    pub fn build(multi: f64, v_stim: f64, t_stim: f64, x: f64) -> Result<Self, DBSError> {
        if ![multi, v_stim, t_stim, x].iter().all(|v| v.is_finite()) {
            return Err(DBSError::InvalidParameter(
                "Pulse shape parameters must be finite".to_string(),
            ));
        }

        if multi <= 0.0 {
            return Err(DBSError::InvalidParameter(
                "The phase multiplier must be positive".to_string(),
            ));
        }

        if t_stim <= 0.0 {
            return Err(DBSError::InvalidParameter(
                "The pulse width must be positive".to_string(),
            ));
        }

        if x < 0.0 {
            return Err(DBSError::InvalidParameter(
                "The neutral phase duration must be non-negative".to_string(),
            ));
        }

        Ok(PulseShape::new(multi, v_stim, t_stim, x))
    }

    /// Returns the amplitude of the anodic phases.
    pub fn anodic_amplitude(&self) -> f64 {
        -self.v_stim / self.multi
    }

    /// Returns the nominal cycle length of the excitatory trace.
    pub fn excitatory_period(&self) -> f64 {
        (2.0 + self.x + self.multi - 1.0) * self.t_stim
    }

    /// Returns the nominal cycle length of the inhibitory trace.
    pub fn inhibitory_period(&self) -> f64 {
        (self.multi + 1.0 + self.x) * self.t_stim
    }

    /// Generate the stimulation traces over the horizon of a simulation.
    pub fn waveform(&self, config: &SimulationConfig) -> StimulusWaveform {
        StimulusWaveform::build(self, config.duration(), config.step_size())
    }
}

/// Represents the excitatory and inhibitory stimulation traces, one sample per simulation step.
#[derive(Debug, PartialEq, Clone)]
pub struct StimulusWaveform {
    /// The input to the excitatory population.
    ue: Vec<f64>,
    /// The input to the inhibitory population.
    ui: Vec<f64>,
    /// The time step between consecutive samples.
    step_size: f64,
}

impl StimulusWaveform {
    /// Generate the traces of a pulse train lasting `duration`, sampled every `step_size`.
    /// Both traces have floor(duration / step_size) samples, none if the ratio is negative.
    ///
    /// The parameters are not checked. A zero `multi` yields infinite anodic samples, and
    /// `step_size` must be non-zero: a zero step saturates the number of samples to
    /// `usize::MAX` and the allocation aborts. Use [`SimulationConfig`] or
    /// [`PulseShape::build`] to validate the inputs beforehand.
    pub fn build(shape: &PulseShape, duration: f64, step_size: f64) -> Self {
        let num_steps = (duration / step_size) as usize;

        if step_size >= RESET_TOLERANCE {
            warn!(
                "Step size {} is not below the reset tolerance {}, pulse cycles may restart early",
                step_size, RESET_TOLERANCE
            );
        }

        let ue = excitatory_trace(shape, num_steps, step_size);
        let ui = inhibitory_trace(shape, num_steps, step_size);

        debug!(
            "Generated pulsatile input with {} steps (excitatory period {}, inhibitory period {})",
            num_steps,
            shape.excitatory_period(),
            shape.inhibitory_period()
        );

        StimulusWaveform { ue, ui, step_size }
    }

    /// Returns the input to the excitatory population.
    pub fn ue(&self) -> &[f64] {
        &self.ue
    }

    /// Returns the input to the inhibitory population.
    pub fn ui(&self) -> &[f64] {
        &self.ui
    }

    /// Returns the number of samples in each trace.
    pub fn len(&self) -> usize {
        self.ue.len()
    }

    /// Returns true if the traces have no samples.
    pub fn is_empty(&self) -> bool {
        self.ue.is_empty()
    }

    /// Returns the time step between consecutive samples.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the simulation time of each sample. The i-th sample is taken at (i + 1) * step_size.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=self.len()).map(move |n| n as f64 * self.step_size)
    }

    /// Consume the waveform and return the (excitatory, inhibitory) traces.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.ue, self.ui)
    }
}

/// Anodic, cathodic, neutral, then an extra anodic phase when multi > 1.
fn excitatory_trace(shape: &PulseShape, num_steps: usize, step_size: f64) -> Vec<f64> {
    let PulseShape {
        multi,
        v_stim,
        t_stim,
        x,
    } = *shape;

    let mut trace = vec![0.0; num_steps];
    let mut t = 0.0;

    for value in trace.iter_mut() {
        t += step_size;

        if 0.0 <= t && t < t_stim {
            *value = -v_stim / multi;
        }

        if t_stim <= t && t < 2.0 * t_stim + step_size {
            *value = v_stim;
        }

        if 2.0 * t_stim + step_size <= t && t < (2.0 + x) * t_stim + step_size {
            *value = 0.0;
        }

        if (2.0 + x) * t_stim + step_size <= t && t < (2.0 + x + multi - 1.0) * t_stim {
            *value = -v_stim / multi;
        }

        // The reset overrides whatever the phases above wrote.
        if t >= (2.0 + x + multi - 1.0) * t_stim - RESET_TOLERANCE {
            t = 0.0;
            *value = 0.0;
        }
    }

    trace
}

/// Cathodic, anodic, then neutral phase.
fn inhibitory_trace(shape: &PulseShape, num_steps: usize, step_size: f64) -> Vec<f64> {
    let PulseShape {
        multi,
        v_stim,
        t_stim,
        x,
    } = *shape;

    let mut trace = vec![0.0; num_steps];
    let mut t = 0.0;

    for value in trace.iter_mut() {
        t += step_size;

        if 0.0 <= t && t < t_stim {
            *value = v_stim;
        }

        if t_stim <= t && t < (multi + 1.0) * t_stim + step_size {
            *value = -v_stim / multi;
        }

        if (multi + 1.0) * t_stim + step_size <= t && t < (multi + 1.0 + x) * t_stim {
            *value = 0.0;
        }

        if t >= (multi + 1.0 + x) * t_stim - RESET_TOLERANCE {
            t = 0.0;
            *value = 0.0;
        }
    }

    trace
}
