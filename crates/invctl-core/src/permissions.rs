//! Role-based action visibility.
//!
//! Used to hide or refuse actions in the UI only. The server checks roles
//! independently and rejects unauthorized writes with 403.

use std::collections::BTreeSet;
use std::fmt;

use crate::session::Role;

/// A write action on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Create,
    Edit,
    Delete,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Actions a role may invoke.
pub fn permitted_actions(role: Role) -> BTreeSet<Action> {
    match role {
        Role::Employee => BTreeSet::new(),
        Role::Manager => BTreeSet::from([Action::Create, Action::Edit]),
        Role::AdminSecurity => BTreeSet::from([Action::Create, Action::Edit, Action::Delete]),
    }
}

pub fn is_permitted(role: Role, action: Action) -> bool {
    permitted_actions(role).contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_has_no_actions() {
        assert!(permitted_actions(Role::Employee).is_empty());
    }

    #[test]
    fn test_admin_is_superset_of_manager() {
        let manager: Role = "gerente".parse().unwrap();
        let admin = permitted_actions(Role::AdminSecurity);
        assert!(admin.is_superset(&permitted_actions(manager)));
    }

    #[test]
    fn test_only_admin_deletes() {
        for role in Role::all() {
            assert_eq!(
                is_permitted(*role, Action::Delete),
                *role == Role::AdminSecurity
            );
        }
    }

    #[test]
    fn test_manager_edits() {
        assert!(is_permitted(Role::Manager, Action::Edit));
        assert!(is_permitted(Role::Manager, Action::Create));
    }
}
