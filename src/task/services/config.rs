//! Configuration for the task store.

use crate::task::domain::TaskDescription;

/// Task store settings.
///
/// # Examples
///
/// ```
/// use smarttodo::task::services::TaskStoreConfig;
///
/// let config = TaskStoreConfig::default();
/// assert_eq!(config.max_description_chars, 200);
///
/// let roomy = TaskStoreConfig::default().with_max_description_chars(500);
/// assert_eq!(roomy.max_description_chars, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStoreConfig {
    /// Maximum description length in characters, after trimming.
    pub max_description_chars: usize,
}

impl Default for TaskStoreConfig {
    fn default() -> Self {
        Self {
            max_description_chars: TaskDescription::DEFAULT_MAX_CHARS,
        }
    }
}

impl TaskStoreConfig {
    /// Overrides the description length limit.
    #[must_use]
    pub const fn with_max_description_chars(mut self, max_description_chars: usize) -> Self {
        self.max_description_chars = max_description_chars;
        self
    }
}
