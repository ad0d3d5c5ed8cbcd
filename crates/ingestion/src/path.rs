//! Root directory validation
//!
//! One rule per platform family:
//! - POSIX: the path must be absolute (`/` rooted)
//! - Windows: the path must be drive-letter rooted (`C:\` or `C:/`)
//!
//! Empty and whitespace-only arguments are always rejected. Trailing
//! separators are optional.

use std::path::PathBuf;
use std::sync::LazyLock;

use contracts::ContractError;
use regex::Regex;
use tracing::debug;

static POSIX_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[^\x00]*$").expect("POSIX root pattern is valid"));

static WINDOWS_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]:[\\/][^\x00]*$").expect("Windows root pattern is valid"));

/// Path shape accepted for the input directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRule {
    Posix,
    Windows,
}

impl PathRule {
    /// Rule for the platform we are running on
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Posix => &POSIX_ROOT,
            Self::Windows => &WINDOWS_ROOT,
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Self::Posix => "expected an absolute path starting with '/'",
            Self::Windows => "expected a drive-rooted path such as 'C:\\music'",
        }
    }
}

/// Validate the input directory argument with the native rule
pub fn validate_root(dir: &str) -> Result<PathBuf, ContractError> {
    validate_root_with(dir, PathRule::native())
}

/// Validate the input directory argument with an explicit rule
pub fn validate_root_with(dir: &str, rule: PathRule) -> Result<PathBuf, ContractError> {
    if dir.trim().is_empty() {
        return Err(ContractError::path(dir, "empty directory argument"));
    }

    if !rule.pattern().is_match(dir) {
        return Err(ContractError::path(dir, rule.hint()));
    }

    debug!(dir, rule = ?rule, "Root directory accepted");
    Ok(PathBuf::from(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_rejected() {
        for dir in ["", " ", "\t"] {
            let err = validate_root_with(dir, PathRule::Posix).unwrap_err();
            assert!(matches!(err, ContractError::Path { .. }));
            assert!(err.to_string().contains("empty"));
        }
    }

    #[test]
    fn test_posix_rule() {
        assert!(validate_root_with("/", PathRule::Posix).is_ok());
        assert!(validate_root_with("/home/me/playlists", PathRule::Posix).is_ok());
        assert!(validate_root_with("/home/me/playlists/", PathRule::Posix).is_ok());
        assert!(validate_root_with("/home/me/Música", PathRule::Posix).is_ok());

        assert!(validate_root_with("playlists", PathRule::Posix).is_err());
        assert!(validate_root_with("./playlists", PathRule::Posix).is_err());
        assert!(validate_root_with("C:\\music", PathRule::Posix).is_err());
    }

    #[test]
    fn test_windows_rule() {
        assert!(validate_root_with("C:\\music", PathRule::Windows).is_ok());
        assert!(validate_root_with("d:\\music\\exports\\", PathRule::Windows).is_ok());
        assert!(validate_root_with("C:/music", PathRule::Windows).is_ok());

        assert!(validate_root_with("/music", PathRule::Windows).is_err());
        assert!(validate_root_with("music\\exports", PathRule::Windows).is_err());
        assert!(validate_root_with("C:", PathRule::Windows).is_err());
    }
}
