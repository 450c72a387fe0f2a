//! Sample windows forwarded to the focus classifier.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const CHANNELS: usize = 6;
pub const SAMPLES_PER_CHANNEL: usize = 320;

/// Fixed-shape multichannel block (`CHANNELS` x `SAMPLES_PER_CHANNEL`).
///
/// The engine never looks inside; it only hands the window to the
/// classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct SignalWindow {
    channels: Vec<Vec<f32>>,
}

impl SignalWindow {
    /// # Errors
    /// Returns an error if the block is not `CHANNELS` x `SAMPLES_PER_CHANNEL`.
    pub fn new(channels: Vec<Vec<f32>>) -> Result<Self, ValidationError> {
        if channels.len() != CHANNELS {
            return Err(ValidationError::InvalidValue {
                field: "channels".into(),
                message: format!("expected {CHANNELS} channels, got {}", channels.len()),
            });
        }
        if let Some((i, c)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != SAMPLES_PER_CHANNEL)
        {
            return Err(ValidationError::InvalidValue {
                field: format!("channels[{i}]"),
                message: format!("expected {SAMPLES_PER_CHANNEL} samples, got {}", c.len()),
            });
        }
        Ok(Self { channels })
    }

    /// Stand-in window for hosts without signal acquisition: every channel
    /// holds one random level.
    pub fn synthetic<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let channels = (0..CHANNELS)
            .map(|_| vec![rng.gen::<f32>(); SAMPLES_PER_CHANNEL])
            .collect();
        Self { channels }
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }
}

impl TryFrom<Vec<Vec<f32>>> for SignalWindow {
    type Error = ValidationError;

    fn try_from(channels: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::new(channels)
    }
}

impl From<SignalWindow> for Vec<Vec<f32>> {
    fn from(window: SignalWindow) -> Self {
        window.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn synthetic_window_has_fixed_shape() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let w = SignalWindow::synthetic(&mut rng);
        assert_eq!(w.channels().len(), CHANNELS);
        assert!(w.channels().iter().all(|c| c.len() == SAMPLES_PER_CHANNEL));
        assert!(w.channels()[0].iter().all(|v| *v == w.channels()[0][0]));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(SignalWindow::new(vec![vec![0.0; SAMPLES_PER_CHANNEL]; 5]).is_err());
        let mut channels = vec![vec![0.0; SAMPLES_PER_CHANNEL]; CHANNELS];
        channels[3].pop();
        assert!(SignalWindow::new(channels).is_err());
    }

    #[test]
    fn deserializing_checks_shape() {
        let json = serde_json::to_string(&vec![vec![0.5f32; 2]; 2]).unwrap();
        assert!(serde_json::from_str::<SignalWindow>(&json).is_err());
    }
}
