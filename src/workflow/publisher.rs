//! Effect publishers.

use super::error::PublishError;
use super::ports::EffectPublisher;
use crate::effects::Effect;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Logs every effect and delivers it nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEffectPublisher;

impl EffectPublisher for LoggingEffectPublisher {
    fn publish_all(&self, effects: &[Effect]) -> Result<(), PublishError> {
        for effect in effects {
            info!(
                run_id = effect.run_id(),
                kind = effect.type_name(),
                ?effect,
                "Publishing effect"
            );
        }
        Ok(())
    }
}

/// Captures published effects in order; can be told to reject everything.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<Effect>>,
    rejection: Option<String>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every call fails with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            rejection: Some(reason.into()),
        }
    }

    /// Effects published so far.
    pub fn published(&self) -> Vec<Effect> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EffectPublisher for RecordingPublisher {
    fn publish_all(&self, effects: &[Effect]) -> Result<(), PublishError> {
        if let Some(reason) = &self.rejection {
            return Err(PublishError::Rejected(reason.clone()));
        }
        self.published
            .lock()
            .map_err(|_| PublishError::Unavailable("recording lock poisoned".to_string()))?
            .extend_from_slice(effects);
        Ok(())
    }
}
