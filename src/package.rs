//! Semantic wrapper for AUR package names.
//!
//! This module provides the [`PackageName`] newtype. A package name selects
//! both the remote repository and the working copy directory, so it is
//! validated once at the CLI boundary and passed around typed afterwards.

use crate::error::{BuilderError, Result};
use std::fmt;
use std::str::FromStr;

/// Base URL of the AUR git host.
pub const AUR_BASE_URL: &str = "https://aur.archlinux.org";

/// A validated AUR package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Validates and wraps a package name.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidPackageName`] when the name is empty,
    /// is `.` or `..`, or contains a path separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use aur_builder::package::PackageName;
    ///
    /// let name = PackageName::new("yay-bin")?;
    /// assert_eq!(name.as_str(), "yay-bin");
    /// assert!(PackageName::new("../etc").is_err());
    /// # Ok::<(), aur_builder::error::BuilderError>(())
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name == "." || name == ".." {
            Some("name refers to a directory")
        } else if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            Some("name contains a path separator")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(BuilderError::InvalidPackageName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    /// Get the package name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the AUR clone URL for this package.
    ///
    /// # Examples
    ///
    /// ```
    /// use aur_builder::package::PackageName;
    ///
    /// let name = PackageName::new("foo")?;
    /// assert_eq!(name.aur_url(), "https://aur.archlinux.org/foo.git");
    /// # Ok::<(), aur_builder::error::BuilderError>(())
    /// ```
    #[must_use]
    pub fn aur_url(&self) -> String {
        format!("{AUR_BASE_URL}/{}.git", self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PackageName {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
