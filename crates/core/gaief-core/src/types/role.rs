//! Role selector values

use crate::{GaiefError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strip one trailing `s`.
///
/// `"students"` becomes `"student"`, `"class"` becomes `"clas"`, and a
/// value with no trailing `s` comes back unchanged.
pub fn singularize(role: &str) -> &str {
    role.strip_suffix('s').unwrap_or(role)
}

/// Who the user is acting as. Always held in its plural UI form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Learners
    #[default]
    Students,
    /// Educators
    Teachers,
    /// Guardians
    Parents,
}

impl Role {
    /// Every selectable role
    pub const ALL: [Role; 3] = [Role::Students, Role::Teachers, Role::Parents];

    /// Plural form, used in `/api/v1/{role}/{id}`
    pub fn plural(&self) -> &'static str {
        match self {
            Role::Students => "students",
            Role::Teachers => "teachers",
            Role::Parents => "parents",
        }
    }

    /// Singular form, used for every `user_role` value
    pub fn singular(&self) -> &'static str {
        singularize(self.plural())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

impl FromStr for Role {
    type Err = GaiefError;

    /// Accepts either form, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.plural() == lower || r.singular() == lower)
            .ok_or_else(|| {
                GaiefError::validation(format!(
                    "Unknown role '{}'. Expected one of: students, teachers, parents",
                    s
                ))
            })
    }
}
