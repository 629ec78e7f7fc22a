use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use staff_directory::routes;
use staff_directory::{Directory, MemoryStore};

macro_rules! app {
    () => {{
        let dir = Directory::new(Arc::new(MemoryStore::new()));
        test::init_service(
            App::new()
                .app_data(web::Data::new(dir.departments))
                .app_data(web::Data::new(dir.staff))
                .configure(routes::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn department_crud_round() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/departments")
        .set_json(json!({ "code": "CS", "name": "Computer Science" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["message"], "Department created successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["level"], 1);
    assert_eq!(body["data"]["isActive"], true);

    let req = test::TestRequest::get().uri("/departments/code/CS").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["name"], "Computer Science");

    let req = test::TestRequest::get()
        .uri("/departments/search?name=Science")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri("/departments")
        .set_json(json!({ "code": "ALG", "name": "Algorithms", "parentId": 1, "level": 2 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], 2);

    let req = test::TestRequest::get().uri("/departments/parent/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let children = body["data"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["code"], "ALG");
    assert_eq!(children[0]["parentId"], 1);

    let req = test::TestRequest::put()
        .uri("/departments/1")
        .set_json(json!({ "code": "CS", "name": "CompSci" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Department updated successfully");

    let req = test::TestRequest::get().uri("/departments/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["name"], "CompSci");

    let req = test::TestRequest::delete().uri("/departments/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Department deleted successfully");
    assert_eq!(body["data"], Value::Null);

    let req = test::TestRequest::get().uri("/departments/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn failures_map_to_status_codes() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/departments")
        .set_json(json!({ "code": "", "name": "Nameless" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 400);
    assert_eq!(body["data"]["errors"][0]["field"], "code");

    let req = test::TestRequest::post()
        .uri("/staff")
        .set_json(json!({ "staffNo": "S001", "name": "Alice", "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/staff")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for uri in ["/departments/search", "/staff/search"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 400, "{uri}");
        assert_eq!(body["data"]["errors"][0]["field"], "query", "{uri}");
    }

    let req = test::TestRequest::post()
        .uri("/staff")
        .set_json(json!({ "staffNo": "S001", "name": "Alice", "departmentId": 9 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/departments")
        .set_json(json!({ "code": "CS", "name": "Computer Science" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::post()
        .uri("/departments")
        .set_json(json!({ "code": "CS", "name": "Computer Science" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Department code already exists: CS");
}

#[actix_web::test]
async fn staff_routes_resolve_department() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/departments")
        .set_json(json!({ "code": "CS", "name": "Computer Science" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/staff")
        .set_json(json!({
            "staffNo": "S001",
            "name": "Alice",
            "departmentId": 1,
            "status": "active",
            "position": "Lecturer",
            "hireDate": "2020-09-01"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["department"]["code"], "CS");
    assert_eq!(body["data"]["hireDate"], "2020-09-01");

    for uri in [
        "/staff",
        "/staff/search?name=Ali",
        "/staff/department/1",
        "/staff/status/active",
        "/staff/position/Lecturer",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1, "{uri}");
    }

    let req = test::TestRequest::get().uri("/staff/staffno/S001").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], 1);

    let req = test::TestRequest::delete().uri("/staff/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/staff/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
