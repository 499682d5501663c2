use common::error::CommonError;
use common::policy::Caller;
use common::rbac::Role;
use common::types::OptionalProperty;
use common::TASK_STATUS_FINISHED;
use common::TASK_STATUS_OPEN;
use metadata::error::MetadataError;
use metadata::projects::CreateProjectRequest;
use metadata::projects::UpdateProjectRequest;
use metadata::tasks::CreateTaskRequest;
use metadata::tasks::UpdateTaskRequest;
use metadata::test_util::create_account;
use metadata::test_util::init_db;

fn forbidden(err: &MetadataError) -> bool {
    matches!(err, MetadataError::Common(CommonError::Forbidden(_)))
}

#[test]
fn test_create_defaults_to_open_status() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let task = md
        .tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "write report".to_string(),
            description: None,
            status: None,
            project_id: None,
        })
        .unwrap();

    assert_eq!(task.status, TASK_STATUS_OPEN);
    assert!(task.updated_at.is_none());
}

#[test]
fn test_create_in_project_requires_membership() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let outsider = create_account(&md, "outsider", Role::User).unwrap();
    let admin = create_account(&md, "root", Role::Admin).unwrap();

    let project = md
        .projects
        .create(CreateProjectRequest {
            created_by: owner.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![],
        })
        .unwrap();

    let req = CreateTaskRequest {
        created_by: outsider.id,
        title: "sneak in".to_string(),
        description: None,
        status: None,
        project_id: Some(project.id),
    };
    assert!(forbidden(&md.tasks.create(req.clone()).unwrap_err()));

    // no admin shortcut here either
    let req = CreateTaskRequest {
        created_by: admin.id,
        title: "sneak in".to_string(),
        description: None,
        status: None,
        project_id: Some(project.id),
    };
    assert!(forbidden(&md.tasks.create(req).unwrap_err()));
    assert!(md.tasks.list_by_project(project.id).unwrap().data.is_empty());
}

#[test]
fn test_update_and_delete_are_owner_or_admin_only() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let other = create_account(&md, "other", Role::User).unwrap();
    let admin = create_account(&md, "root", Role::Admin).unwrap();

    let task = md
        .tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "write report".to_string(),
            description: None,
            status: None,
            project_id: None,
        })
        .unwrap();

    let req = UpdateTaskRequest {
        title: OptionalProperty::Some("rewrite report".to_string()),
        ..Default::default()
    };
    let err = md
        .tasks
        .update(&Caller::new(other.id, Role::User), task.id, req.clone())
        .unwrap_err();
    assert!(forbidden(&err));

    let updated = md
        .tasks
        .update(&Caller::new(admin.id, Role::Admin), task.id, req)
        .unwrap();
    assert_eq!(updated.title, "rewrite report");
    assert!(updated.updated_at.is_some());

    let err = md
        .tasks
        .delete(&Caller::new(other.id, Role::User), task.id)
        .unwrap_err();
    assert!(forbidden(&err));

    md.tasks
        .delete(&Caller::new(owner.id, Role::User), task.id)
        .unwrap();
    assert!(matches!(
        md.tasks.get_by_id(task.id),
        Err(MetadataError::NotFound(_))
    ));
}

#[test]
fn test_attach_standalone_task_requires_membership() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let other = create_account(&md, "other", Role::User).unwrap();

    let project = md
        .projects
        .create(CreateProjectRequest {
            created_by: other.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![],
        })
        .unwrap();
    let task = md
        .tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "write report".to_string(),
            description: None,
            status: None,
            project_id: None,
        })
        .unwrap();

    let req = UpdateTaskRequest {
        project_id: OptionalProperty::Some(project.id),
        ..Default::default()
    };
    let err = md
        .tasks
        .update(&Caller::new(owner.id, Role::User), task.id, req.clone())
        .unwrap_err();
    assert!(forbidden(&err));

    md.projects
        .update(
            &Caller::new(other.id, Role::User),
            project.id,
            UpdateProjectRequest {
                updated_by: other.id,
                collaborators: OptionalProperty::Some(vec![other.id, owner.id]),
                ..Default::default()
            },
        )
        .unwrap();

    let attached = md
        .tasks
        .update(&Caller::new(owner.id, Role::User), task.id, req)
        .unwrap();
    assert_eq!(attached.project_id, Some(project.id));
}

#[test]
fn test_mark_finished_owner_and_collaborator_only() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let other = create_account(&md, "other", Role::User).unwrap();
    let admin = create_account(&md, "root", Role::Admin).unwrap();

    let project = md
        .projects
        .create(CreateProjectRequest {
            created_by: owner.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![],
        })
        .unwrap();
    let task = md
        .tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "write report".to_string(),
            description: None,
            status: None,
            project_id: Some(project.id),
        })
        .unwrap();

    // only the owner may finish, admins included
    assert!(forbidden(&md.tasks.mark_finished(other.id, task.id).unwrap_err()));
    assert!(forbidden(&md.tasks.mark_finished(admin.id, task.id).unwrap_err()));

    let finished = md.tasks.mark_finished(owner.id, task.id).unwrap();
    assert_eq!(finished.status, TASK_STATUS_FINISHED);

    // finishing twice is a no-op, not an error
    let again = md.tasks.mark_finished(owner.id, task.id).unwrap();
    assert_eq!(again.status, TASK_STATUS_FINISHED);

    // dropping the owner from the project revokes the right to finish
    md.projects
        .update(
            &Caller::new(owner.id, Role::User),
            project.id,
            UpdateProjectRequest {
                updated_by: owner.id,
                collaborators: OptionalProperty::Some(vec![other.id]),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(forbidden(&md.tasks.mark_finished(owner.id, task.id).unwrap_err()));
}

#[test]
fn test_set_status_follows_project_membership() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let collab = create_account(&md, "collab", Role::User).unwrap();
    let outsider = create_account(&md, "outsider", Role::User).unwrap();

    let project = md
        .projects
        .create(CreateProjectRequest {
            created_by: owner.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![collab.id],
        })
        .unwrap();
    let task = md
        .tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "write report".to_string(),
            description: None,
            status: None,
            project_id: Some(project.id),
        })
        .unwrap();

    // any collaborator may move a project task, outsiders may not
    let moved = md
        .tasks
        .set_status(collab.id, task.id, "In Review".to_string())
        .unwrap();
    assert_eq!(moved.status, "In Review");
    assert!(forbidden(
        &md.tasks
            .set_status(outsider.id, task.id, "Blocked".to_string())
            .unwrap_err()
    ));

    // a standalone task belongs to its owner alone
    let solo = md
        .tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "solo".to_string(),
            description: None,
            status: None,
            project_id: None,
        })
        .unwrap();
    assert!(forbidden(
        &md.tasks
            .set_status(collab.id, solo.id, "Blocked".to_string())
            .unwrap_err()
    ));
    let moved = md
        .tasks
        .set_status(owner.id, solo.id, "Blocked".to_string())
        .unwrap();
    assert_eq!(moved.status, "Blocked");
}

#[test]
fn test_list_scoping() {
    let md = init_db().unwrap();

    let a = create_account(&md, "a", Role::User).unwrap();
    let b = create_account(&md, "b", Role::User).unwrap();
    let project = md
        .projects
        .create(CreateProjectRequest {
            created_by: a.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![b.id],
        })
        .unwrap();

    for (who, title, pid) in [
        (a.id, "a1", Some(project.id)),
        (a.id, "a2", None),
        (b.id, "b1", Some(project.id)),
    ] {
        md.tasks
            .create(CreateTaskRequest {
                created_by: who,
                title: title.to_string(),
                description: None,
                status: None,
                project_id: pid,
            })
            .unwrap();
    }

    assert_eq!(md.tasks.list_by_user(a.id).unwrap().data.len(), 2);
    assert_eq!(md.tasks.list_by_project(project.id).unwrap().data.len(), 2);
    assert_eq!(
        md.tasks
            .list_by_user_and_project(b.id, project.id)
            .unwrap()
            .data
            .len(),
        1
    );
}
