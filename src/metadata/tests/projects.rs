use common::error::CommonError;
use common::policy::Caller;
use common::rbac::Role;
use common::types::OptionalProperty;
use metadata::error::MetadataError;
use metadata::projects::CreateProjectRequest;
use metadata::projects::UpdateProjectRequest;
use metadata::tasks::CreateTaskRequest;
use metadata::test_util::create_account;
use metadata::test_util::init_db;

fn forbidden(err: &MetadataError) -> bool {
    matches!(err, MetadataError::Common(CommonError::Forbidden(_)))
}

#[test]
fn test_create_adds_creator_to_collaborators() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let c1 = create_account(&md, "c1", Role::User).unwrap();
    let c2 = create_account(&md, "c2", Role::User).unwrap();

    let project = md
        .projects
        .create(CreateProjectRequest {
            created_by: owner.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![c2.id, c1.id, c1.id],
        })
        .unwrap();

    assert_eq!(project.collaborators, vec![owner.id, c1.id, c2.id]);
}

#[test]
fn test_create_rejects_unknown_collaborator() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let err = md
        .projects
        .create(CreateProjectRequest {
            created_by: owner.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![999],
        })
        .unwrap_err();
    assert!(matches!(err, MetadataError::NotFound(_)));
}

#[test]
fn test_update_requires_collaborator_or_admin() {
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

    let req = UpdateProjectRequest {
        updated_by: outsider.id,
        name: OptionalProperty::Some("renamed".to_string()),
        ..Default::default()
    };
    let err = md
        .projects
        .update(&Caller::new(outsider.id, Role::User), project.id, req)
        .unwrap_err();
    assert!(forbidden(&err));

    let req = UpdateProjectRequest {
        updated_by: admin.id,
        name: OptionalProperty::Some("renamed".to_string()),
        ..Default::default()
    };
    let updated = md
        .projects
        .update(&Caller::new(admin.id, Role::Admin), project.id, req)
        .unwrap();
    assert_eq!(updated.name, "renamed");
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.updated_by, Some(admin.id));
}

#[test]
fn test_update_replaces_collaborator_set() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let c1 = create_account(&md, "c1", Role::User).unwrap();
    let c2 = create_account(&md, "c2", Role::User).unwrap();

    let project = md
        .projects
        .create(CreateProjectRequest {
            created_by: owner.id,
            name: "board".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![c1.id],
        })
        .unwrap();

    // an empty set is ignored, membership stays as it was
    let req = UpdateProjectRequest {
        updated_by: owner.id,
        collaborators: OptionalProperty::Some(vec![]),
        ..Default::default()
    };
    let unchanged = md
        .projects
        .update(&Caller::new(owner.id, Role::User), project.id, req)
        .unwrap();
    assert_eq!(unchanged.collaborators, project.collaborators);

    // a non-empty set replaces membership wholesale, even dropping the caller
    let req = UpdateProjectRequest {
        updated_by: owner.id,
        collaborators: OptionalProperty::Some(vec![c2.id]),
        ..Default::default()
    };
    let replaced = md
        .projects
        .update(&Caller::new(owner.id, Role::User), project.id, req)
        .unwrap();
    assert_eq!(replaced.collaborators, vec![c2.id]);

    // the previous owner locked themselves out
    let req = UpdateProjectRequest {
        updated_by: owner.id,
        name: OptionalProperty::Some("again".to_string()),
        ..Default::default()
    };
    let err = md
        .projects
        .update(&Caller::new(owner.id, Role::User), project.id, req)
        .unwrap_err();
    assert!(forbidden(&err));
}

#[test]
fn test_delete_cascades_project_tasks() {
    let md = init_db().unwrap();

    let owner = create_account(&md, "owner", Role::User).unwrap();
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

    for title in ["a", "b"] {
        md.tasks
            .create(CreateTaskRequest {
                created_by: owner.id,
                title: title.to_string(),
                description: None,
                status: None,
                project_id: Some(project.id),
            })
            .unwrap();
    }
    let standalone = md
        .tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "keep".to_string(),
            description: None,
            status: None,
            project_id: None,
        })
        .unwrap();

    md.projects
        .delete(&Caller::new(owner.id, Role::User), project.id)
        .unwrap();

    assert!(matches!(
        md.projects.get_by_id(project.id),
        Err(MetadataError::NotFound(_))
    ));
    assert!(md.tasks.list_by_project(project.id).unwrap().data.is_empty());
    assert_eq!(md.tasks.get_by_id(standalone.id).unwrap().id, standalone.id);
}

#[test]
fn test_list_for_account_scopes_to_membership() {
    let md = init_db().unwrap();

    let a = create_account(&md, "a", Role::User).unwrap();
    let b = create_account(&md, "b", Role::User).unwrap();

    md.projects
        .create(CreateProjectRequest {
            created_by: a.id,
            name: "mine".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![],
        })
        .unwrap();
    md.projects
        .create(CreateProjectRequest {
            created_by: b.id,
            name: "shared".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![a.id],
        })
        .unwrap();
    md.projects
        .create(CreateProjectRequest {
            created_by: b.id,
            name: "theirs".to_string(),
            description: None,
            img_url: None,
            collaborators: vec![],
        })
        .unwrap();

    let visible = md.projects.list_for_account(a.id).unwrap();
    let names: Vec<&str> = visible.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["mine", "shared"]);
    assert_eq!(md.projects.list().unwrap().data.len(), 3);
}
