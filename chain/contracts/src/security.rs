//! Shared security primitives for contract modules
//!
//! Reusable guards and access control used by the vault and the exchange.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::AccountId;

/// Reentrancy guard preventing nested calls into protected functions.
///
/// A contract function acquires the guard before executing state-changing
/// logic and releases it on completion. Any nested call attempt fails.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    pub fn release(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Access control roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full control, including role management
    Admin,
    /// May flip the pause switch
    Pauser,
}

/// Role-based access control manager.
///
/// Exactly one account holds `Admin` at a time.
#[derive(Debug, Clone)]
pub struct AccessControl {
    roles: HashMap<AccountId, Role>,
    admin: AccountId,
}

impl AccessControl {
    /// Create access control with an initial admin.
    pub fn new(admin: AccountId) -> Self {
        let mut roles = HashMap::new();
        roles.insert(admin, Role::Admin);
        Self { roles, admin }
    }

    pub fn has_role(&self, caller: AccountId, role: Role) -> bool {
        self.roles.get(&caller) == Some(&role)
    }

    pub fn is_admin(&self, caller: AccountId) -> bool {
        self.has_role(caller, Role::Admin)
    }

    /// Admins and pausers may pause
    pub fn can_pause(&self, caller: AccountId) -> bool {
        self.is_admin(caller) || self.has_role(caller, Role::Pauser)
    }

    /// Assign a non-admin role. Only admin can assign roles.
    pub fn grant_role(&mut self, admin_caller: AccountId, target: AccountId, role: Role) -> bool {
        if !self.is_admin(admin_caller) || role == Role::Admin || target == self.admin {
            return false;
        }
        self.roles.insert(target, role);
        true
    }

    /// Remove a role from an account. Only admin can revoke.
    pub fn revoke_role(&mut self, admin_caller: AccountId, target: AccountId) -> bool {
        if !self.is_admin(admin_caller) {
            return false;
        }
        // Cannot revoke the primary admin
        if target == self.admin {
            return false;
        }
        self.roles.remove(&target).is_some()
    }

    /// Transfer admin to a new account.
    pub fn transfer_admin(&mut self, current_admin: AccountId, new_admin: AccountId) -> bool {
        if !self.is_admin(current_admin) {
            return false;
        }
        self.roles.remove(&current_admin);
        self.roles.insert(new_admin, Role::Admin);
        self.admin = new_admin;
        true
    }

    pub fn admin(&self) -> AccountId {
        self.admin
    }
}

/// Composable pause modifier.
///
/// When paused, protected operations must be rejected.
#[derive(Debug, Clone, Default)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    pub fn new() -> Self {
        Self { paused: false }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
