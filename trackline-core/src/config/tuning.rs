//! Persisted axis tuning
//!
//! Stores the tick interval, kinematic limits and corrector gains found
//! during bring-up so they can be written to flash and loaded on boot.
//! Only configuration is persisted; trajectories never are.

use serde::{Deserialize, Serialize};

use super::types::{validate_interval, AxisConfig, MotionLimits, PdGains};

/// Magic number to identify valid tuning data
pub const TUNING_MAGIC: u32 = 0x5452_4B54; // "TRKT"

/// Current tuning data version
pub const TUNING_VERSION: u8 = 1;

/// Upper bound on the encoded size of a [`TuningRecord`]
pub const TUNING_MAX_SIZE: usize = 64;

/// Errors from encoding or decoding tuning data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningError {
    /// Buffer too small or serializer failure
    Encode,
    /// Bytes are not a tuning record
    Decode,
    /// Magic number mismatch
    BadMagic,
    /// Record written by a different format version
    UnsupportedVersion,
    /// Stored tick interval is not usable
    InvalidInterval,
}

/// Tuning data for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningRecord {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Tick interval in seconds
    pub interval: f32,
    /// Kinematic limits
    pub limits: MotionLimits,
    /// Position error gains
    pub gains: PdGains,
}

impl TuningRecord {
    /// Create a record stamped with the current magic and version
    pub const fn new(interval: f32, limits: MotionLimits, gains: PdGains) -> Self {
        Self {
            magic: TUNING_MAGIC,
            version: TUNING_VERSION,
            interval,
            limits,
            gains,
        }
    }

    /// Capture the tuning of an axis configured with PD gains
    pub fn from_axis_config(config: &AxisConfig<PdGains>) -> Self {
        Self::new(config.interval, config.limits, config.corrector)
    }

    /// Axis configuration described by this record
    pub fn to_axis_config(&self) -> AxisConfig<PdGains> {
        AxisConfig {
            interval: self.interval,
            limits: self.limits,
            corrector: self.gains,
        }
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], TuningError> {
        postcard::to_slice(self, buf).map_err(|_| TuningError::Encode)
    }

    /// Deserialize and validate a record
    pub fn decode(bytes: &[u8]) -> Result<Self, TuningError> {
        let record: Self = postcard::from_bytes(bytes).map_err(|_| TuningError::Decode)?;
        if record.magic != TUNING_MAGIC {
            return Err(TuningError::BadMagic);
        }
        if record.version != TUNING_VERSION {
            return Err(TuningError::UnsupportedVersion);
        }
        validate_interval(record.interval).map_err(|_| TuningError::InvalidInterval)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TuningRecord {
        TuningRecord::new(
            0.001,
            MotionLimits::new(100.0, 200.0, 1000.0),
            PdGains::new(8.0, 0.2).with_max_output(60.0),
        )
    }

    #[test]
    fn test_encode_decode() {
        let record = sample();
        let mut buf = [0u8; TUNING_MAX_SIZE];
        let used = record.encode(&mut buf).unwrap().len();
        assert!(used <= TUNING_MAX_SIZE);

        let decoded = TuningRecord::decode(&buf[..used]).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 4];
        assert_eq!(sample().encode(&mut buf).unwrap_err(), TuningError::Encode);
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut record = sample();
        record.magic = 0xDEAD_BEEF;
        let mut buf = [0u8; TUNING_MAX_SIZE];
        let used = record.encode(&mut buf).unwrap().len();
        assert_eq!(
            TuningRecord::decode(&buf[..used]),
            Err(TuningError::BadMagic)
        );
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let mut record = sample();
        record.version = TUNING_VERSION + 1;
        let mut buf = [0u8; TUNING_MAX_SIZE];
        let used = record.encode(&mut buf).unwrap().len();
        assert_eq!(
            TuningRecord::decode(&buf[..used]),
            Err(TuningError::UnsupportedVersion)
        );
    }

    #[test]
    fn test_decode_rejects_zero_interval() {
        let mut record = sample();
        record.interval = 0.0;
        let mut buf = [0u8; TUNING_MAX_SIZE];
        let used = record.encode(&mut buf).unwrap().len();
        assert_eq!(
            TuningRecord::decode(&buf[..used]),
            Err(TuningError::InvalidInterval)
        );
    }

    #[test]
    fn test_decode_garbage() {
        assert_eq!(TuningRecord::decode(&[]), Err(TuningError::Decode));
    }

    #[test]
    fn test_axis_config_conversion() {
        let record = sample();
        let config = record.to_axis_config();
        assert_eq!(config.interval, 0.001);
        assert_eq!(config.corrector, record.gains);
        assert_eq!(TuningRecord::from_axis_config(&config), record);
    }
}
