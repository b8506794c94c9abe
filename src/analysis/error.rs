//! Error types for the rainy-day analysis core.

/// Error type for all fallible operations of [`crate::aggregate`] and [`crate::compare`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A numeric or categorical argument was outside its domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// What is wrong with the supplied value.
        reason: String,
    },

    /// One or both day groups have no observations after filtering.
    #[error("insufficient data: the {group} group has no observed days")]
    InsufficientData {
        /// Which group is empty (`"weekday"` or `"weekend"`).
        group: &'static str,
    },
}

impl AnalysisError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
