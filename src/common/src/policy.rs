//! Access decisions for projects and tasks.
//!
//! Every function here is a pure predicate over the caller and entity facts.
//! Callers load the entities, this module only decides. There are two
//! distinct status-transition rules: finishing a task requires ownership and
//! current collaboration, while a plain status change on a project task is
//! open to any current collaborator. Both rules are kept as-is.

use serde::Deserialize;
use serde::Serialize;

use crate::error::CommonError;
use crate::rbac::Role;
use crate::Result;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub account_id: u64,
    pub role: Role,
}

impl Caller {
    pub fn new(account_id: u64, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

fn is_collaborator(collaborators: &[u64], account_id: u64) -> bool {
    collaborators.contains(&account_id)
}

fn forbidden(msg: &str) -> CommonError {
    CommonError::Forbidden(msg.to_string())
}

/// Single permission tier for project read, update and delete: admins and
/// current collaborators only. A project with an empty collaborator set is
/// unreachable for every non-admin.
pub fn check_project_access(caller: &Caller, collaborators: &[u64]) -> Result<()> {
    if caller.is_admin() || is_collaborator(collaborators, caller.account_id) {
        return Ok(());
    }

    Err(forbidden("not a collaborator on this project"))
}

/// Reading a task: admin, owner, or collaborator of the task's project.
pub fn check_task_read(
    caller: &Caller,
    owner_id: u64,
    collaborators: Option<&[u64]>,
) -> Result<()> {
    if caller.is_admin() || caller.account_id == owner_id {
        return Ok(());
    }
    if let Some(collaborators) = collaborators {
        if is_collaborator(collaborators, caller.account_id) {
            return Ok(());
        }
    }

    Err(forbidden("no permission to access this task"))
}

/// Editing or deleting a task is gated on ownership, not collaboration.
/// Collaborators who can read a project task still may not touch it.
pub fn check_task_edit(caller: &Caller, owner_id: u64) -> Result<()> {
    if caller.is_admin() || caller.account_id == owner_id {
        return Ok(());
    }

    Err(forbidden("no permission to modify this task"))
}

/// Attaching a previously standalone task to a project.
pub fn check_task_attach(caller: &Caller, collaborators: &[u64]) -> Result<()> {
    if caller.is_admin() || is_collaborator(collaborators, caller.account_id) {
        return Ok(());
    }

    Err(forbidden("not a collaborator on the target project"))
}

/// Creating a task inside a project: the creator must already be a
/// collaborator. No admin bypass at this call site.
pub fn check_task_create_in_project(account_id: u64, collaborators: &[u64]) -> Result<()> {
    if is_collaborator(collaborators, account_id) {
        return Ok(());
    }

    Err(forbidden("not a collaborator on this project"))
}

/// Finishing a task: the caller must own it, and when the task belongs to a
/// project they must additionally still be a current collaborator. Losing
/// collaboration after creating the task revokes the right to finish it.
pub fn check_task_finish(
    account_id: u64,
    owner_id: u64,
    collaborators: Option<&[u64]>,
) -> Result<()> {
    if account_id != owner_id {
        return Err(forbidden("caller does not own this task"));
    }
    if let Some(collaborators) = collaborators {
        if !is_collaborator(collaborators, account_id) {
            return Err(forbidden("no longer a collaborator on this project"));
        }
    }

    Ok(())
}

/// Setting an arbitrary status: on a project task any current collaborator
/// may do it regardless of ownership; on a standalone task only the owner.
pub fn check_task_status_change(
    account_id: u64,
    owner_id: u64,
    collaborators: Option<&[u64]>,
) -> Result<()> {
    match collaborators {
        Some(collaborators) => {
            if is_collaborator(collaborators, account_id) {
                return Ok(());
            }

            Err(forbidden("not a collaborator on this project"))
        }
        None => {
            if account_id == owner_id {
                return Ok(());
            }

            Err(forbidden("caller does not own this task"))
        }
    }
}
