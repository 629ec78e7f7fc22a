use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, OpenApi};

use crate::department::DepartmentManager;
use crate::error::ServiceError;
use crate::model::{Department, DepartmentRequest, Staff, StaffRequest};
use crate::response::ApiResponse;
use crate::staff::StaffManager;
use crate::validation::{FieldError, ensure_valid};

type HandlerResult = Result<HttpResponse, ServiceError>;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    /// Substring to look for in the name, case-sensitive.
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/departments",
    tag = "department",
    responses((status = 200, description = "All departments", body = [Department]))
)]
#[get("/departments")]
async fn list_departments(departments: web::Data<DepartmentManager>) -> HandlerResult {
    info!("GET /departments - Get all departments");
    let list = departments.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    get,
    path = "/departments/search",
    tag = "department",
    params(NameQuery),
    responses((status = 200, description = "Departments whose name matches", body = [Department]))
)]
#[get("/departments/search")]
async fn search_departments(
    departments: web::Data<DepartmentManager>,
    query: web::Query<NameQuery>,
) -> HandlerResult {
    info!(name = %query.name, "GET /departments/search - Search departments");
    let list = departments.search_by_name(&query.name).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    get,
    path = "/departments/{id}",
    tag = "department",
    params(("id" = i64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department found", body = Department),
        (status = 404, description = "Department not found")
    )
)]
#[get("/departments/{id}")]
async fn get_department(
    departments: web::Data<DepartmentManager>,
    id: web::Path<i64>,
) -> HandlerResult {
    let id = id.into_inner();
    info!(id, "GET /departments/{{id}} - Get department by id");
    let department = departments.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(department)))
}

#[utoipa::path(
    get,
    path = "/departments/code/{code}",
    tag = "department",
    params(("code" = String, Path, description = "Department code")),
    responses(
        (status = 200, description = "Department found", body = Department),
        (status = 404, description = "Department not found")
    )
)]
#[get("/departments/code/{code}")]
async fn get_department_by_code(
    departments: web::Data<DepartmentManager>,
    code: web::Path<String>,
) -> HandlerResult {
    let code = code.into_inner();
    info!(code = %code, "GET /departments/code/{{code}} - Get department by code");
    let department = departments.get_by_code(&code).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(department)))
}

#[utoipa::path(
    get,
    path = "/departments/parent/{parent_id}",
    tag = "department",
    params(("parent_id" = i64, Path, description = "Parent department id")),
    responses((status = 200, description = "Child departments", body = [Department]))
)]
#[get("/departments/parent/{parent_id}")]
async fn list_child_departments(
    departments: web::Data<DepartmentManager>,
    parent_id: web::Path<i64>,
) -> HandlerResult {
    let parent_id = parent_id.into_inner();
    info!(parent_id, "GET /departments/parent/{{parent_id}} - Get departments by parent id");
    let list = departments.list_by_parent(parent_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    post,
    path = "/departments",
    tag = "department",
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department created", body = Department),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Department code already exists")
    )
)]
#[post("/departments")]
async fn create_department(
    departments: web::Data<DepartmentManager>,
    request: web::Json<DepartmentRequest>,
) -> HandlerResult {
    let request = request.into_inner();
    info!(name = %request.name, "POST /departments - Create new department");
    ensure_valid(request.validate())?;
    let department = departments.create(request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with(
        "Department created successfully",
        department,
    )))
}

#[utoipa::path(
    put,
    path = "/departments/{id}",
    tag = "department",
    params(("id" = i64, Path, description = "Department id")),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Department code already exists")
    )
)]
#[put("/departments/{id}")]
async fn update_department(
    departments: web::Data<DepartmentManager>,
    id: web::Path<i64>,
    request: web::Json<DepartmentRequest>,
) -> HandlerResult {
    let id = id.into_inner();
    info!(id, "PUT /departments/{{id}} - Update department");
    let request = request.into_inner();
    ensure_valid(request.validate())?;
    let department = departments.update(id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with(
        "Department updated successfully",
        department,
    )))
}

#[utoipa::path(
    delete,
    path = "/departments/{id}",
    tag = "department",
    params(("id" = i64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 404, description = "Department not found")
    )
)]
#[delete("/departments/{id}")]
async fn delete_department(
    departments: web::Data<DepartmentManager>,
    id: web::Path<i64>,
) -> HandlerResult {
    let id = id.into_inner();
    info!(id, "DELETE /departments/{{id}} - Delete department");
    departments.delete(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Department deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/staff",
    tag = "staff",
    responses((status = 200, description = "All staff", body = [Staff]))
)]
#[get("/staff")]
async fn list_staff(staff: web::Data<StaffManager>) -> HandlerResult {
    info!("GET /staff - Get all staff");
    let list = staff.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    get,
    path = "/staff/search",
    tag = "staff",
    params(NameQuery),
    responses((status = 200, description = "Staff whose name matches", body = [Staff]))
)]
#[get("/staff/search")]
async fn search_staff(
    staff: web::Data<StaffManager>,
    query: web::Query<NameQuery>,
) -> HandlerResult {
    info!(name = %query.name, "GET /staff/search - Search staff");
    let list = staff.search_by_name(&query.name).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    get,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = i64, Path, description = "Staff id")),
    responses(
        (status = 200, description = "Staff found", body = Staff),
        (status = 404, description = "Staff not found")
    )
)]
#[get("/staff/{id}")]
async fn get_staff(staff: web::Data<StaffManager>, id: web::Path<i64>) -> HandlerResult {
    let id = id.into_inner();
    info!(id, "GET /staff/{{id}} - Get staff by id");
    let member = staff.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(member)))
}

#[utoipa::path(
    get,
    path = "/staff/staffno/{staff_no}",
    tag = "staff",
    params(("staff_no" = String, Path, description = "Staff number")),
    responses(
        (status = 200, description = "Staff found", body = Staff),
        (status = 404, description = "Staff not found")
    )
)]
#[get("/staff/staffno/{staff_no}")]
async fn get_staff_by_staff_no(
    staff: web::Data<StaffManager>,
    staff_no: web::Path<String>,
) -> HandlerResult {
    let staff_no = staff_no.into_inner();
    info!(staff_no = %staff_no, "GET /staff/staffno/{{staff_no}} - Get staff by staff number");
    let member = staff.get_by_staff_no(&staff_no).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(member)))
}

#[utoipa::path(
    get,
    path = "/staff/department/{department_id}",
    tag = "staff",
    params(("department_id" = i64, Path, description = "Department id")),
    responses((status = 200, description = "Staff in the department", body = [Staff]))
)]
#[get("/staff/department/{department_id}")]
async fn list_staff_by_department(
    staff: web::Data<StaffManager>,
    department_id: web::Path<i64>,
) -> HandlerResult {
    let department_id = department_id.into_inner();
    info!(department_id, "GET /staff/department/{{department_id}} - Get staff by department");
    let list = staff.list_by_department(department_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    get,
    path = "/staff/status/{status}",
    tag = "staff",
    params(("status" = String, Path, description = "Employment status")),
    responses((status = 200, description = "Staff with the status", body = [Staff]))
)]
#[get("/staff/status/{status}")]
async fn list_staff_by_status(
    staff: web::Data<StaffManager>,
    status: web::Path<String>,
) -> HandlerResult {
    let status = status.into_inner();
    info!(status = %status, "GET /staff/status/{{status}} - Get staff by status");
    let list = staff.list_by_status(&status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    get,
    path = "/staff/position/{position}",
    tag = "staff",
    params(("position" = String, Path, description = "Position title")),
    responses((status = 200, description = "Staff holding the position", body = [Staff]))
)]
#[get("/staff/position/{position}")]
async fn list_staff_by_position(
    staff: web::Data<StaffManager>,
    position: web::Path<String>,
) -> HandlerResult {
    let position = position.into_inner();
    info!(position = %position, "GET /staff/position/{{position}} - Get staff by position");
    let list = staff.list_by_position(&position).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[utoipa::path(
    post,
    path = "/staff",
    tag = "staff",
    request_body = StaffRequest,
    responses(
        (status = 200, description = "Staff created", body = Staff),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Staff number already exists")
    )
)]
#[post("/staff")]
async fn create_staff(
    staff: web::Data<StaffManager>,
    request: web::Json<StaffRequest>,
) -> HandlerResult {
    let request = request.into_inner();
    info!(name = %request.name, "POST /staff - Create new staff");
    ensure_valid(request.validate())?;
    let member = staff.create(request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with(
        "Staff created successfully",
        member,
    )))
}

#[utoipa::path(
    put,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = i64, Path, description = "Staff id")),
    request_body = StaffRequest,
    responses(
        (status = 200, description = "Staff updated", body = Staff),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Staff or department not found"),
        (status = 409, description = "Staff number already exists")
    )
)]
#[put("/staff/{id}")]
async fn update_staff(
    staff: web::Data<StaffManager>,
    id: web::Path<i64>,
    request: web::Json<StaffRequest>,
) -> HandlerResult {
    let id = id.into_inner();
    info!(id, "PUT /staff/{{id}} - Update staff");
    let request = request.into_inner();
    ensure_valid(request.validate())?;
    let member = staff.update(id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with(
        "Staff updated successfully",
        member,
    )))
}

#[utoipa::path(
    delete,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = i64, Path, description = "Staff id")),
    responses(
        (status = 200, description = "Staff deleted"),
        (status = 404, description = "Staff not found")
    )
)]
#[delete("/staff/{id}")]
async fn delete_staff(staff: web::Data<StaffManager>, id: web::Path<i64>) -> HandlerResult {
    let id = id.into_inner();
    info!(id, "DELETE /staff/{{id}} - Delete staff");
    staff.delete(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Staff deleted successfully")))
}

/// Rejects unreadable JSON bodies with the same envelope as field errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::ValidationFailed(vec![FieldError::new("body", &err.to_string())]).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ServiceError::ValidationFailed(vec![FieldError::new("query", &err.to_string())]).into()
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_departments,
        search_departments,
        get_department,
        get_department_by_code,
        list_child_departments,
        create_department,
        update_department,
        delete_department,
        list_staff,
        search_staff,
        get_staff,
        get_staff_by_staff_no,
        list_staff_by_department,
        list_staff_by_status,
        list_staff_by_position,
        create_staff,
        update_staff,
        delete_staff
    ),
    components(schemas(Department, DepartmentRequest, Staff, StaffRequest)),
    tags(
        (name = "department", description = "Department API"),
        (name = "staff", description = "Staff API")
    )
)]
pub struct ApiDoc;

/// Registers every route. The managers must already be in app data.
/// Search routes come before `{id}` so "search" is not parsed as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(list_departments)
        .service(search_departments)
        .service(get_department_by_code)
        .service(list_child_departments)
        .service(get_department)
        .service(create_department)
        .service(update_department)
        .service(delete_department)
        .service(list_staff)
        .service(search_staff)
        .service(get_staff_by_staff_no)
        .service(list_staff_by_department)
        .service(list_staff_by_status)
        .service(list_staff_by_position)
        .service(get_staff)
        .service(create_staff)
        .service(update_staff)
        .service(delete_staff);
}
