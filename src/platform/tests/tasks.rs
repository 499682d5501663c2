use common::error::CommonError;
use common::rbac::Role;
use metadata::error::MetadataError;
use metadata::projects::CreateProjectRequest;
use metadata::tasks::CreateTaskRequest;
use metadata::test_util::create_account;
use metadata::test_util::init_db;
use platform::tasks::Tasks;
use platform::Context;
use platform::PlatformError;

fn ctx(account_id: u64, role: Role) -> Context {
    Context { account_id, role }
}

#[tokio::test]
async fn test_list_own_in_project_requires_membership() {
    let md = init_db().unwrap();
    let svc = Tasks::new(md.tasks.clone(), md.projects.clone());

    let owner = create_account(&md, "owner", Role::User).unwrap();
    let outsider = create_account(&md, "outsider", Role::User).unwrap();

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
    md.tasks
        .create(CreateTaskRequest {
            created_by: owner.id,
            title: "mine".to_string(),
            description: None,
            status: None,
            project_id: Some(project.id),
        })
        .unwrap();

    // a non-collaborator gets 403, not a quietly empty list
    let err = svc
        .list_own_in_project(ctx(outsider.id, Role::User), project.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Common(CommonError::Forbidden(_))
    ));

    let resp = svc
        .list_own_in_project(ctx(owner.id, Role::User), project.id)
        .await
        .unwrap();
    assert_eq!(resp.data.len(), 1);

    // a missing project surfaces as not-found instead of an empty list
    let err = svc
        .list_own_in_project(ctx(owner.id, Role::User), 999)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Metadata(MetadataError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_own_scopes_to_caller_even_for_admin() {
    let md = init_db().unwrap();
    let svc = Tasks::new(md.tasks.clone(), md.projects.clone());

    let admin = create_account(&md, "root", Role::Admin).unwrap();
    let user = create_account(&md, "worker", Role::User).unwrap();

    for (creator, title) in [(admin.id, "admins"), (user.id, "workers")] {
        md.tasks
            .create(CreateTaskRequest {
                created_by: creator,
                title: title.to_string(),
                description: None,
                status: None,
                project_id: None,
            })
            .unwrap();
    }

    // the all-tasks view and the own-tasks view differ for an admin
    let all = svc.list(ctx(admin.id, Role::Admin)).await.unwrap();
    assert_eq!(all.data.len(), 2);

    let own = svc.list_own(ctx(admin.id, Role::Admin)).await.unwrap();
    assert_eq!(own.data.len(), 1);
    assert_eq!(own.data[0].title, "admins");
}
