//! Input device configuration.

use crate::error::{Error, Result};
use std::time::Duration;
use usbmidi_proto::ParameterScope;

/// Configuration for the endpoint poll thread.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Timeout of each blocking endpoint read (default: 10ms).
    /// Also bounds how long `stop()` waits for the thread.
    pub read_timeout: Duration,
    /// Maximum wait between reads while suspended (default: 100ms).
    /// `resume()` cuts the wait short.
    pub suspend_wait: Duration,
    /// Poll thread name (default: derived from the device address)
    pub thread_name: Option<String>,
    /// Run the poll thread at maximum priority (default: true)
    pub elevated_priority: bool,
    /// Keying of RPN/NRPN state (default: shared across cables)
    pub parameter_scope: ParameterScope,
    /// Scratch buffer size for each read (default: the endpoint's max packet size)
    pub read_buffer_size: Option<usize>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(10),
            suspend_wait: Duration::from_millis(100),
            thread_name: None,
            elevated_priority: true,
            parameter_scope: ParameterScope::Shared,
            read_buffer_size: None,
        }
    }
}

impl InputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.read_timeout.is_zero() {
            return Err(Error::InvalidConfig("read_timeout must be non-zero".into()));
        }
        if self.suspend_wait.is_zero() {
            return Err(Error::InvalidConfig("suspend_wait must be non-zero".into()));
        }
        if self.read_buffer_size == Some(0) {
            return Err(Error::InvalidConfig("read_buffer_size must be non-zero".into()));
        }
        Ok(())
    }

    /// Scratch size for an endpoint reporting `max_packet_size`.
    pub(crate) fn scratch_size(&self, max_packet_size: usize) -> usize {
        self.read_buffer_size.unwrap_or(max_packet_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InputConfig::default();
        assert_eq!(config.read_timeout, Duration::from_millis(10));
        assert_eq!(config.suspend_wait, Duration::from_millis(100));
        assert!(config.thread_name.is_none());
        assert!(config.elevated_priority);
        assert_eq!(config.parameter_scope, ParameterScope::Shared);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_durations() {
        let config = InputConfig {
            read_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = InputConfig {
            suspend_wait: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scratch_size_override() {
        let mut config = InputConfig::default();
        assert_eq!(config.scratch_size(64), 64);

        config.read_buffer_size = Some(512);
        assert_eq!(config.scratch_size(64), 512);

        config.read_buffer_size = Some(0);
        assert!(config.validate().is_err());
    }
}
