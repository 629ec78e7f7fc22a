use std::sync::Arc;

use staff_directory::model::DepartmentRequest;
use staff_directory::{Directory, MemoryStore};

fn directory() -> Directory {
    Directory::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn create_assigns_id_and_defaults() {
    let dir = directory();
    let created = dir
        .departments
        .create(DepartmentRequest::new("CS", "Computer Science"))
        .await
        .unwrap();

    assert_eq!(created.id, 1);
    assert_eq!(created.code, "CS");
    assert_eq!(created.level, 1);
    assert!(created.is_active);
    assert_eq!(created.created_at, created.updated_at);

    let by_code = dir.departments.get_by_code("CS").await.unwrap();
    assert_eq!(by_code, created);
}

#[tokio::test]
async fn duplicate_code_is_a_conflict_and_leaves_original() {
    let dir = directory();
    let original = dir
        .departments
        .create(DepartmentRequest::new("CS", "Computer Science"))
        .await
        .unwrap();

    let err = dir
        .departments
        .create(DepartmentRequest::new("CS", "Cognitive Science"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    assert_eq!(dir.departments.get_by_id(original.id).await.unwrap(), original);
    assert_eq!(dir.departments.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let dir = directory();
    assert!(dir.departments.get_by_id(42).await.unwrap_err().is_not_found());
    assert!(dir.departments.get_by_code("NOPE").await.unwrap_err().is_not_found());
    assert!(
        dir.departments
            .update(42, DepartmentRequest::new("X", "X"))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(dir.departments.delete(42).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn update_is_visible_through_cached_lookup() {
    let dir = directory();
    let created = dir
        .departments
        .create(DepartmentRequest::new("CS", "Computer Science"))
        .await
        .unwrap();
    // Prime the cache with the pre-update value.
    dir.departments.get_by_id(created.id).await.unwrap();

    let request = DepartmentRequest {
        code: "CSE".into(),
        name: "CompSci".into(),
        description: Some("Engineering".into()),
        parent_id: Some(9),
        level: 2,
        is_active: false,
    };
    dir.departments.update(created.id, request.clone()).await.unwrap();

    let fetched = dir.departments.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.code, request.code);
    assert_eq!(fetched.name, request.name);
    assert_eq!(fetched.description, request.description);
    assert_eq!(fetched.parent_id, request.parent_id);
    assert_eq!(fetched.level, request.level);
    assert_eq!(fetched.is_active, request.is_active);
    assert_eq!(fetched.created_at, created.created_at);
    assert!(fetched.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_overwrites_optional_fields() {
    let dir = directory();
    let mut request = DepartmentRequest::new("CS", "Computer Science");
    request.description = Some("old".into());
    request.parent_id = Some(3);
    let created = dir.departments.create(request).await.unwrap();

    let updated = dir
        .departments
        .update(created.id, DepartmentRequest::new("CS", "Computer Science"))
        .await
        .unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.parent_id, None);
}

#[tokio::test]
async fn code_change_checks_other_departments_only() {
    let dir = directory();
    let cs = dir
        .departments
        .create(DepartmentRequest::new("CS", "Computer Science"))
        .await
        .unwrap();
    dir.departments
        .create(DepartmentRequest::new("MA", "Mathematics"))
        .await
        .unwrap();

    let err = dir
        .departments
        .update(cs.id, DepartmentRequest::new("MA", "Computer Science"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(dir.departments.get_by_id(cs.id).await.unwrap().code, "CS");

    let same_code = dir
        .departments
        .update(cs.id, DepartmentRequest::new("CS", "Computing"))
        .await
        .unwrap();
    assert_eq!(same_code.name, "Computing");
}

#[tokio::test]
async fn delete_then_lookup_is_not_found() {
    let dir = directory();
    let created = dir
        .departments
        .create(DepartmentRequest::new("CS", "Computer Science"))
        .await
        .unwrap();
    dir.departments.get_by_id(created.id).await.unwrap();

    dir.departments.delete(created.id).await.unwrap();

    assert!(dir.departments.get_by_id(created.id).await.unwrap_err().is_not_found());
    assert!(dir.departments.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn filters_by_parent_and_name() {
    let dir = directory();
    let root = dir
        .departments
        .create(DepartmentRequest::new("SCI", "Science"))
        .await
        .unwrap();
    for (code, name) in [("PHY", "Physics"), ("CHEM", "Chemistry")] {
        let mut request = DepartmentRequest::new(code, name);
        request.parent_id = Some(root.id);
        request.level = 2;
        dir.departments.create(request).await.unwrap();
    }
    dir.departments
        .create(DepartmentRequest::new("ART", "Fine Arts"))
        .await
        .unwrap();

    let mut children: Vec<_> = dir
        .departments
        .list_by_parent(root.id)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.code)
        .collect();
    children.sort();
    assert_eq!(children, vec!["CHEM", "PHY"]);
    assert!(dir.departments.list_by_parent(999).await.unwrap().is_empty());

    let matches = dir.departments.search_by_name("ics").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].code, "PHY");
    // Case-sensitive.
    assert!(dir.departments.search_by_name("physics").await.unwrap().is_empty());
}
