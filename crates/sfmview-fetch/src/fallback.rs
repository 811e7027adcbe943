use crate::locator::AssetVariant;

/// Result of one download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The server answered with a success status.
    Success,
    /// The attempt failed.
    Failure {
        /// The response status, `None` for transport failures.
        status: Option<u16>,
    },
}

/// State of the compact then full resolution of an asset.
///
/// The compact variant is tried first. Only a failed compact attempt leads
/// to a single attempt on the full variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackState {
    /// Waiting for the compact variant.
    #[default]
    TryingMini,
    /// The compact variant failed, waiting for the full one.
    TryingFull,
    /// An attempt succeeded.
    Resolved(AssetVariant),
    /// Both attempts failed.
    Failed {
        /// Status of the full attempt, `None` for a transport failure.
        last_status: Option<u16>,
    },
}

impl FallbackState {
    /// The variant to request next, `None` once resolved or failed.
    pub fn pending_variant(&self) -> Option<AssetVariant> {
        match self {
            FallbackState::TryingMini => Some(AssetVariant::Mini),
            FallbackState::TryingFull => Some(AssetVariant::Full),
            FallbackState::Resolved(_) | FallbackState::Failed { .. } => None,
        }
    }

    /// Move to the next state after an attempt.
    ///
    /// Resolved and failed states are final.
    pub fn advance(self, outcome: AttemptOutcome) -> Self {
        match (self, outcome) {
            (FallbackState::TryingMini, AttemptOutcome::Success) => {
                FallbackState::Resolved(AssetVariant::Mini)
            }
            (FallbackState::TryingMini, AttemptOutcome::Failure { .. }) => FallbackState::TryingFull,
            (FallbackState::TryingFull, AttemptOutcome::Success) => {
                FallbackState::Resolved(AssetVariant::Full)
            }
            (FallbackState::TryingFull, AttemptOutcome::Failure { status }) => {
                FallbackState::Failed {
                    last_status: status,
                }
            }
            (done, _) => done,
        }
    }

    /// Status of the last attempt of a failed resolution.
    pub fn last_status(&self) -> Option<u16> {
        match self {
            FallbackState::Failed { last_status } => *last_status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_success() {
        let state = FallbackState::default().advance(AttemptOutcome::Success);
        assert_eq!(state, FallbackState::Resolved(AssetVariant::Mini));
        assert_eq!(state.pending_variant(), None);
    }

    #[test]
    fn test_single_fallback() {
        let state = FallbackState::TryingMini.advance(AttemptOutcome::Failure { status: Some(404) });
        assert_eq!(state.pending_variant(), Some(AssetVariant::Full));

        let resolved = state.advance(AttemptOutcome::Success);
        assert_eq!(resolved, FallbackState::Resolved(AssetVariant::Full));

        let failed = state.advance(AttemptOutcome::Failure { status: Some(403) });
        assert_eq!(failed.pending_variant(), None);
        assert_eq!(failed.last_status(), Some(403));
    }

    #[test]
    fn test_final_states() {
        let failed = FallbackState::Failed { last_status: None };
        assert_eq!(failed.advance(AttemptOutcome::Success), failed);

        let resolved = FallbackState::Resolved(AssetVariant::Mini);
        assert_eq!(
            resolved.advance(AttemptOutcome::Failure { status: Some(500) }),
            resolved
        );
    }
}
