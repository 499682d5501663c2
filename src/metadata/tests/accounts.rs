use common::rbac::Role;
use common::types::OptionalProperty;
use metadata::accounts::UpdateAccountRequest;
use metadata::error::MetadataError;
use metadata::test_util::create_account;
use metadata::test_util::init_db;

#[test]
fn test_unique_username_and_email() {
    let md = init_db().unwrap();

    let acc = create_account(&md, "alice", Role::User).unwrap();
    assert_eq!(acc.id, 1);
    assert_eq!(md.accounts.get_by_username("alice").unwrap().id, acc.id);
    assert_eq!(
        md.accounts
            .get_by_email("alice@example.com")
            .unwrap()
            .id,
        acc.id
    );

    // same username again
    let err = create_account(&md, "alice", Role::User).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MetadataError>(),
        Some(MetadataError::AlreadyExists(_))
    ));
}

#[test]
fn test_concurrent_create_with_same_username() {
    let md = init_db().unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let md = md.clone();
            std::thread::spawn(move || create_account(&md, "eve", Role::User))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // the locking read in the constraint check serializes the race: exactly
    // one insert wins, the loser errors instead of committing a duplicate
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(md.accounts.list().unwrap().data.len(), 1);
    assert_eq!(md.accounts.get_by_username("eve").unwrap().username, "eve");
}

#[test]
fn test_update_reindexes_username_and_email() {
    let md = init_db().unwrap();

    let acc = create_account(&md, "bob", Role::User).unwrap();
    create_account(&md, "carol", Role::User).unwrap();

    // taking an occupied username is rejected
    let req = UpdateAccountRequest {
        updated_by: acc.id,
        username: OptionalProperty::Some("carol".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        md.accounts.update(acc.id, req),
        Err(MetadataError::AlreadyExists(_))
    ));

    let req = UpdateAccountRequest {
        updated_by: acc.id,
        username: OptionalProperty::Some("bobby".to_string()),
        email: OptionalProperty::Some("bobby@example.com".to_string()),
        ..Default::default()
    };
    let updated = md.accounts.update(acc.id, req).unwrap();
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.updated_by, Some(acc.id));

    assert_eq!(md.accounts.get_by_username("bobby").unwrap().id, acc.id);
    assert!(matches!(
        md.accounts.get_by_username("bob"),
        Err(MetadataError::NotFound(_))
    ));
    assert!(matches!(
        md.accounts.get_by_email("bob@example.com"),
        Err(MetadataError::NotFound(_))
    ));
}

#[test]
fn test_reset_token_lookup() {
    let md = init_db().unwrap();

    let acc = create_account(&md, "dave", Role::User).unwrap();
    let req = UpdateAccountRequest {
        updated_by: acc.id,
        reset_token: OptionalProperty::Some(Some("tok-123".to_string())),
        ..Default::default()
    };
    md.accounts.update(acc.id, req).unwrap();

    assert_eq!(md.accounts.get_by_reset_token("tok-123").unwrap().id, acc.id);

    // clearing the token drops the index entry
    let req = UpdateAccountRequest {
        updated_by: acc.id,
        reset_token: OptionalProperty::Some(None),
        ..Default::default()
    };
    md.accounts.update(acc.id, req).unwrap();
    assert!(matches!(
        md.accounts.get_by_reset_token("tok-123"),
        Err(MetadataError::NotFound(_))
    ));
}

#[test]
fn test_list_by_role_and_delete() {
    let md = init_db().unwrap();

    create_account(&md, "u1", Role::User).unwrap();
    let mgr = create_account(&md, "m1", Role::Manager).unwrap();
    create_account(&md, "u2", Role::User).unwrap();

    assert_eq!(md.accounts.list_by_role(Role::User).unwrap().data.len(), 2);
    assert_eq!(
        md.accounts.list_by_role(Role::Manager).unwrap().data.len(),
        1
    );

    md.accounts.delete(mgr.id).unwrap();
    assert!(matches!(
        md.accounts.get_by_id(mgr.id),
        Err(MetadataError::NotFound(_))
    ));
    assert!(matches!(
        md.accounts.get_by_username("m1"),
        Err(MetadataError::NotFound(_))
    ));
}
