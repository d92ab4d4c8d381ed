//! # Permission Policy
//!
//! A decision authorizes a command iff `error_code == 0` and
//! `level >= required_level(command)`.
//!
//! `force_error_code_zero` treats every error code as zero. Older nodes did
//! this unconditionally; here it is opt-in.

use super::decision::PermissionDecision;
use super::errors::AuthorizationError;
use serde::{Deserialize, Serialize};
use shared_types::Command;

/// Default minimum level for both commands.
pub const DEFAULT_REQUIRED_LEVEL: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionPolicy {
    /// Ignore the error code returned by the authority.
    pub force_error_code_zero: bool,
    /// Minimum level for `lock`.
    pub lock_level: u64,
    /// Minimum level for `unlock`.
    pub unlock_level: u64,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self {
            force_error_code_zero: false,
            lock_level: DEFAULT_REQUIRED_LEVEL,
            unlock_level: DEFAULT_REQUIRED_LEVEL,
        }
    }
}

impl PermissionPolicy {
    pub fn required_level(&self, command: Command) -> u64 {
        match command {
            Command::Lock => self.lock_level,
            Command::Unlock => self.unlock_level,
        }
    }

    /// True when the override would hide a non-zero error code.
    pub fn masks(&self, decision: &PermissionDecision) -> bool {
        self.force_error_code_zero && decision.error_code != 0
    }

    /// Apply the policy to an authority answer.
    pub fn evaluate(
        &self,
        decision: PermissionDecision,
        command: Command,
    ) -> Result<PermissionDecision, AuthorizationError> {
        let error_code = if self.force_error_code_zero {
            0
        } else {
            decision.error_code
        };
        if error_code != 0 {
            return Err(AuthorizationError::QueryRejected { error_code });
        }

        let required = self.required_level(command);
        if decision.level < required {
            return Err(AuthorizationError::Unauthorized {
                level: decision.level,
                required,
            });
        }

        Ok(PermissionDecision {
            error_code,
            level: decision.level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requires_level_one() {
        let policy = PermissionPolicy::default();
        assert_eq!(policy.required_level(Command::Lock), 1);
        assert_eq!(policy.required_level(Command::Unlock), 1);
        assert!(!policy.force_error_code_zero);
    }

    #[test]
    fn test_sufficient_level_authorizes() {
        let policy = PermissionPolicy::default();
        let decision = policy
            .evaluate(PermissionDecision::granted(1), Command::Unlock)
            .unwrap();
        assert_eq!(decision.level, 1);
    }

    #[test]
    fn test_level_zero_is_unauthorized() {
        let policy = PermissionPolicy::default();
        assert_eq!(
            policy.evaluate(PermissionDecision::granted(0), Command::Lock),
            Err(AuthorizationError::Unauthorized {
                level: 0,
                required: 1
            })
        );
    }

    #[test]
    fn test_error_code_rejects() {
        let policy = PermissionPolicy::default();
        let decision = PermissionDecision {
            error_code: 3,
            level: 5,
        };
        assert_eq!(
            policy.evaluate(decision, Command::Lock),
            Err(AuthorizationError::QueryRejected { error_code: 3 })
        );
        assert!(!policy.masks(&decision));
    }

    #[test]
    fn test_force_error_code_zero_masks() {
        let policy = PermissionPolicy {
            force_error_code_zero: true,
            ..Default::default()
        };
        let decision = PermissionDecision {
            error_code: 3,
            level: 1,
        };

        assert!(policy.masks(&decision));
        assert_eq!(
            policy.evaluate(decision, Command::Unlock),
            Ok(PermissionDecision::granted(1))
        );
    }

    #[test]
    fn test_force_error_code_zero_still_checks_level() {
        let policy = PermissionPolicy {
            force_error_code_zero: true,
            ..Default::default()
        };
        assert!(matches!(
            policy.evaluate(PermissionDecision::failed(9), Command::Lock),
            Err(AuthorizationError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_per_command_levels() {
        let policy = PermissionPolicy {
            unlock_level: 2,
            ..Default::default()
        };
        assert!(policy
            .evaluate(PermissionDecision::granted(1), Command::Lock)
            .is_ok());
        assert!(policy
            .evaluate(PermissionDecision::granted(1), Command::Unlock)
            .is_err());
    }
}
