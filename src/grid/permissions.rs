//! Permission checks used to gate row actions.

use std::collections::HashSet;

/// Answers whether the caller holds any of the given permissions.
pub trait PermissionChecker {
    fn has_permission(&self, permissions: &[String]) -> bool;
}

/// The permission names granted to the current user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }
}

impl PermissionChecker for PermissionSet {
    /// An empty requirement list is always satisfied.
    fn has_permission(&self, permissions: &[String]) -> bool {
        permissions.is_empty() || permissions.iter().any(|p| self.0.contains(p))
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
