//! Think time between a simulated user's tasks

use rand::Rng;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaitTime {
    /// Always the same pause
    Constant(Duration),
    /// Uniformly distributed pause in `[min, max]`
    Between { min: Duration, max: Duration },
}

impl WaitTime {
    /// Uniform wait between two bounds given in seconds
    pub fn between_secs(min: f64, max: f64) -> Self {
        WaitTime::Between {
            min: Duration::from_secs_f64(min),
            max: Duration::from_secs_f64(max),
        }
    }

    /// Draw the next pause
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            WaitTime::Constant(duration) => duration,
            WaitTime::Between { min, max } => {
                if max <= min {
                    return min;
                }
                let secs = rng.random_range(min.as_secs_f64()..=max.as_secs_f64());
                Duration::from_secs_f64(secs)
            }
        }
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitTime::Constant(d) => write!(f, "{}s", d.as_secs_f64()),
            WaitTime::Between { min, max } => {
                write!(f, "{}s-{}s", min.as_secs_f64(), max.as_secs_f64())
            }
        }
    }
}
