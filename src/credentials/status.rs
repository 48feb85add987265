//! Outcome codes for vault operations

use std::fmt;

/// Outcome of a vault operation, with a stable integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    NotFound,
    AccessDenied,
    Locked,
    PlatformFailure,
}

// Security.framework OSStatus values
const ERR_SEC_SUCCESS: i32 = 0;
const ERR_SEC_ITEM_NOT_FOUND: i32 = -25300;
const ERR_SEC_AUTH_FAILED: i32 = -25293;
const ERR_SEC_USER_CANCELED: i32 = -128;
const ERR_SEC_INTERACTION_NOT_ALLOWED: i32 = -25308;
const ERR_SEC_NO_SUCH_KEYCHAIN: i32 = -25294;
const ERR_SEC_NO_DEFAULT_KEYCHAIN: i32 = -25307;

impl Status {
    pub fn code(&self) -> i32 {
        match self {
            Status::Success => 0,
            Status::NotFound => 1,
            Status::AccessDenied => 2,
            Status::Locked => 3,
            Status::PlatformFailure => 4,
        }
    }

    /// Classify a macOS `OSStatus` returned by the keychain.
    pub fn from_os_status(os_status: i32) -> Self {
        match os_status {
            ERR_SEC_SUCCESS => Status::Success,
            ERR_SEC_ITEM_NOT_FOUND => Status::NotFound,
            ERR_SEC_AUTH_FAILED | ERR_SEC_USER_CANCELED => Status::AccessDenied,
            ERR_SEC_INTERACTION_NOT_ALLOWED
            | ERR_SEC_NO_SUCH_KEYCHAIN
            | ERR_SEC_NO_DEFAULT_KEYCHAIN => Status::Locked,
            _ => Status::PlatformFailure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::NotFound => "not found",
            Status::AccessDenied => "access denied",
            Status::Locked => "locked",
            Status::PlatformFailure => "platform failure",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Status::Success.code(), 0);
        assert_eq!(Status::NotFound.code(), 1);
        assert_eq!(Status::AccessDenied.code(), 2);
        assert_eq!(Status::Locked.code(), 3);
        assert_eq!(Status::PlatformFailure.code(), 4);
    }

    #[test]
    fn test_os_status_mapping() {
        assert_eq!(Status::from_os_status(0), Status::Success);
        assert_eq!(Status::from_os_status(-25300), Status::NotFound);
        assert_eq!(Status::from_os_status(-25293), Status::AccessDenied);
        assert_eq!(Status::from_os_status(-128), Status::AccessDenied);
        assert_eq!(Status::from_os_status(-25308), Status::Locked);
        assert_eq!(Status::from_os_status(-25294), Status::Locked);
        assert_eq!(Status::from_os_status(-34018), Status::PlatformFailure);
    }

    #[test]
    fn test_only_success_is_success() {
        assert!(Status::Success.is_success());
        assert!(!Status::NotFound.is_success());
    }
}
