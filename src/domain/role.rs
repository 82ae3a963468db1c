//! Role membership changes.

use std::collections::HashSet;

use super::error::{ValidationError, ValidationResult};
use super::id::EthAddress;
use crate::marshal_args;

/// Grant or revoke a role for a set of wallets.
///
/// `owner` is the namespace owning the role (`"system"` for engine-level
/// roles, otherwise a provider address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChangeInput {
    pub owner: String,
    pub role_name: String,
    pub wallets: Vec<EthAddress>,
}

marshal_args!(RoleChangeInput {
    required owner,
    required role_name,
    required wallets,
});

impl RoleChangeInput {
    pub fn validate(&self) -> ValidationResult {
        validate_owner(&self.owner)?;
        validate_role_name(&self.role_name)?;
        if self.wallets.is_empty() {
            return Err(ValidationError::new("wallets", "must not be empty"));
        }
        let mut seen = HashSet::new();
        for wallet in &self.wallets {
            if !seen.insert(wallet) {
                return Err(ValidationError::new(
                    "wallets",
                    format!("duplicate wallet {wallet}"),
                ));
            }
        }
        Ok(())
    }
}

/// Membership query for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreMembersOfInput {
    pub owner: String,
    pub role_name: String,
    pub wallets: Vec<EthAddress>,
}

marshal_args!(AreMembersOfInput {
    required owner,
    required role_name,
    required wallets,
});

impl AreMembersOfInput {
    pub fn validate(&self) -> ValidationResult {
        validate_owner(&self.owner)?;
        validate_role_name(&self.role_name)?;
        if self.wallets.is_empty() {
            return Err(ValidationError::new("wallets", "must not be empty"));
        }
        Ok(())
    }
}

fn validate_owner(owner: &str) -> ValidationResult {
    if owner == "system" {
        return Ok(());
    }
    EthAddress::parse_field("owner", owner).map(|_| ())
}

fn validate_role_name(name: &str) -> ValidationResult {
    if name.is_empty() {
        return Err(ValidationError::new("role_name", "must not be empty"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b':')
    {
        return Err(ValidationError::new(
            "role_name",
            format!("'{name}' may only contain a-z, 0-9, '_' and ':'"),
        ));
    }
    Ok(())
}
