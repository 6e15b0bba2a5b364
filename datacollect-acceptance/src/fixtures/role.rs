use std::fmt;
use std::str::FromStr;

/// Test users seeded into the database dump, one per permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Full rights on every dimension and measure group.
    Admin,
    /// May read and change elements.
    Editor,
    /// May only read.
    Viewer,
    /// Authenticates but has no rights on the seeded objects.
    NoAccess,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Editor, Role::Viewer, Role::NoAccess];

    /// Key of this role in the `credentials` configuration section.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
            Role::NoAccess => "no_access",
        }
    }

    pub fn can_write(self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }

    pub fn can_read(self) -> bool {
        !matches!(self, Role::NoAccess)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_permissions() {
        assert!(Role::Editor.can_write());
        assert!(!Role::Viewer.can_write());
        assert!(Role::Viewer.can_read());
        assert!(!Role::NoAccess.can_read());
    }
}
