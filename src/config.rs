//! Timing parameters shared by the simulation driver and the input generators.
//!
//! # Examples
//!
//! ```
//! use dbs_inputs::config::SimulationConfig;
//!
//! let config = SimulationConfig::build(100.0, 0.1, 20.0, Some(42)).unwrap();
//! assert_eq!(config.num_steps(), 1000);
//! assert_eq!(config.num_sample_steps(), 200);
//! ```
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::error::DBSError;

/// Default duration of a simulation (in ms).
pub const DEFAULT_DURATION: f64 = 25_000.0;
/// Default time step (in ms).
pub const DEFAULT_STEP_SIZE: f64 = 0.1;
/// Default duration of a sample window (in ms).
pub const DEFAULT_SAMPLE_DURATION: f64 = 20.0;

/// Represents the timing parameters of a simulation run.
/// The parameters cannot be modified once the configuration is built, and deserialization
/// goes through the same checks as [`SimulationConfig::build`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(try_from = "RawConfig")]
pub struct SimulationConfig {
    /// Duration of the simulation (in ms).
    duration: f64,
    /// Time step (in ms).
    step_size: f64,
    /// Duration of a sample window (in ms), consumed by downstream sampling.
    sample_duration: f64,
    /// Seed of the random stream, if any.
    seed: Option<u64>,
}

/// Unchecked parameters as read from a configuration file.
#[derive(Deserialize)]
struct RawConfig {
    duration: f64,
    step_size: f64,
    sample_duration: f64,
    seed: Option<u64>,
}

impl TryFrom<RawConfig> for SimulationConfig {
    type Error = DBSError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        SimulationConfig::build(raw.duration, raw.step_size, raw.sample_duration, raw.seed)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            duration: DEFAULT_DURATION,
            step_size: DEFAULT_STEP_SIZE,
            sample_duration: DEFAULT_SAMPLE_DURATION,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration with the specified parameters.
    /// Returns an error if a duration or the step size is not a positive finite number.
    pub fn build(
        duration: f64,
        step_size: f64,
        sample_duration: f64,
        seed: Option<u64>,
    ) -> Result<Self, DBSError> {
        check_positive("duration", duration)?;
        check_positive("step size", step_size)?;
        check_positive("sample duration", sample_duration)?;

        Ok(SimulationConfig {
            duration,
            step_size,
            sample_duration,
            seed,
        })
    }

    /// Returns the duration of the simulation (in ms).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the time step (in ms).
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the duration of a sample window (in ms).
    pub fn sample_duration(&self) -> f64 {
        self.sample_duration
    }

    /// Returns the seed of the random stream, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the number of simulation steps, i.e., the floor of duration / step size.
    pub fn num_steps(&self) -> usize {
        (self.duration / self.step_size) as usize
    }

    /// Returns the number of steps in a sample window.
    pub fn num_sample_steps(&self) -> usize {
        (self.sample_duration / self.step_size) as usize
    }

    /// Returns a fresh random stream for the run.
    /// With a seed, two calls return identical streams. Without one, the stream is seeded from
    /// the operating system and the run is not reproducible.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => {
                warn!("No seed provided, the random stream is not reproducible");
                ChaCha8Rng::from_entropy()
            }
        }
    }

    /// Save the configuration to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), DBSError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a configuration from a JSON file.
    /// Out-of-domain parameters are reported as [`DBSError::InvalidParameter`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, DBSError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let config: SimulationConfig = serde_json::from_reader(reader)?;
        info!("Configuration loaded from {}", path.as_ref().display());
        Ok(config)
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), DBSError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DBSError::InvalidParameter(format!(
            "The {} must be a positive finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default() {
        let config = SimulationConfig::default();
        assert_eq!(config.duration(), 25_000.0);
        assert_eq!(config.step_size(), 0.1);
        assert_eq!(config.sample_duration(), 20.0);
        assert_eq!(config.seed(), None);
        assert_eq!(config.num_steps(), 250_000);
    }

    #[test]
    fn test_build() {
        let config = SimulationConfig::build(10.0, 0.25, 2.0, Some(7)).unwrap();
        assert_eq!(config.num_steps(), 40);
        assert_eq!(config.num_sample_steps(), 8);
        assert_eq!(config.seed(), Some(7));

        // num_steps is floored
        let config = SimulationConfig::build(1.0, 0.3, 1.0, None).unwrap();
        assert_eq!(config.num_steps(), 3);

        assert!(matches!(
            SimulationConfig::build(0.0, 0.1, 20.0, None),
            Err(DBSError::InvalidParameter(_))
        ));
        assert!(matches!(
            SimulationConfig::build(100.0, -0.1, 20.0, None),
            Err(DBSError::InvalidParameter(_))
        ));
        assert!(matches!(
            SimulationConfig::build(100.0, 0.1, f64::NAN, None),
            Err(DBSError::InvalidParameter(_))
        ));
        assert!(matches!(
            SimulationConfig::build(f64::INFINITY, 0.1, 20.0, None),
            Err(DBSError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rng_seeded() {
        let config = SimulationConfig::build(100.0, 0.1, 20.0, Some(42)).unwrap();
        let mut rng1 = config.rng();
        let mut rng2 = config.rng();
        let draws1: Vec<f64> = (0..10).map(|_| rng1.gen()).collect();
        let draws2: Vec<f64> = (0..10).map(|_| rng2.gen()).collect();
        assert_eq!(draws1, draws2);

        let other = SimulationConfig::build(100.0, 0.1, 20.0, Some(43)).unwrap();
        let draws3: Vec<f64> = (0..10).map(|_| other.rng().gen()).collect();
        assert_ne!(draws1, draws3);
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = SimulationConfig::build(500.0, 0.05, 10.0, Some(3)).unwrap();
        config.save_to(&path).unwrap();
        assert_eq!(SimulationConfig::load_from(&path).unwrap(), config);

        let config = SimulationConfig::default();
        config.save_to(&path).unwrap();
        assert_eq!(SimulationConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_deserialize() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{"duration": 100.0, "step_size": 0.5, "sample_duration": 20.0, "seed": 5}"#,
        )
        .unwrap();
        assert_eq!(config.num_steps(), 200);
        assert_eq!(config.seed(), Some(5));

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<SimulationConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_deserialize_invalid() {
        // Every document below fails the checks of SimulationConfig::build
        for json in [
            r#"{"duration": 100.0, "step_size": 0.0, "sample_duration": 20.0, "seed": null}"#,
            r#"{"duration": 100.0, "step_size": -0.1, "sample_duration": 20.0, "seed": null}"#,
            r#"{"duration": -5.0, "step_size": 0.1, "sample_duration": 20.0, "seed": 1}"#,
            r#"{"duration": 100.0, "step_size": 0.1, "sample_duration": 0.0, "seed": 1}"#,
        ] {
            let err = serde_json::from_str::<SimulationConfig>(json).unwrap_err();
            assert!(
                err.to_string().contains("must be a positive finite number"),
                "unexpected error: {}",
                err
            );
        }

        // Missing fields are not filled with defaults
        assert!(serde_json::from_str::<SimulationConfig>(r#"{"duration": 100.0}"#).is_err());
    }

    #[test]
    fn test_load_invalid() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("negative.json");
        std::fs::write(
            &path,
            r#"{"duration": 100.0, "step_size": -0.1, "sample_duration": 20.0, "seed": null}"#,
        )
        .unwrap();
        assert!(matches!(
            SimulationConfig::load_from(&path),
            Err(DBSError::InvalidParameter(_))
        ));

        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            SimulationConfig::load_from(&path),
            Err(DBSError::IOError(_))
        ));

        assert!(matches!(
            SimulationConfig::load_from(dir.path().join("missing.json")),
            Err(DBSError::IOError(_))
        ));
    }
}
