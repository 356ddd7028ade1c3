//! Optimistic concurrency capability for mutable records.

use crate::errors::{DomainError, DomainResult};

/// Version-checked mutation guard
///
/// Every mutable business record carries a version column that the
/// persistence layer bumps on each update. A submitter echoes the version
/// it read; a mismatch means someone else saved in between, and the update
/// must be rejected without side effects.
pub trait Versioned {
    /// Current persisted version of the record
    fn version(&self) -> i64;

    /// Rejects the update when the submitted version is stale
    fn check_version(&self, submitted: i64) -> DomainResult<()> {
        let current = self.version();
        if submitted == current {
            Ok(())
        } else {
            Err(DomainError::VersionConflict { submitted, current })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record {
        version: i64,
    }

    impl Versioned for Record {
        fn version(&self) -> i64 {
            self.version
        }
    }

    #[test]
    fn test_matching_version_passes() {
        let record = Record { version: 4 };
        assert!(record.check_version(4).is_ok());
    }

    #[test]
    fn test_stale_version_rejected() {
        let record = Record { version: 4 };
        match record.check_version(2) {
            Err(DomainError::VersionConflict { submitted, current }) => {
                assert_eq!(submitted, 2);
                assert_eq!(current, 4);
            }
            other => panic!("expected VersionConflict, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_future_version_rejected() {
        let record = Record { version: 4 };
        assert!(record.check_version(9).is_err());
    }
}
