use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules;
use crate::utils::pagination::{PaginationMeta, PaginationParams};
use crate::utils::status::RequestStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        modules::auth::controller::login,
        modules::auth::controller::me,
        modules::schools::controller::create_school,
        modules::schools::controller::list_schools,
        modules::students::controller::create_student,
        modules::students::controller::get_students,
        modules::students::controller::get_student,
        modules::students::controller::update_student,
        modules::students::controller::delete_student,
        modules::classes::controller::create_class,
        modules::classes::controller::list_classes,
        modules::academics::controller::create_timetable_entry,
        modules::academics::controller::get_class_timetable,
        modules::academics::controller::create_material,
        modules::academics::controller::get_class_materials,
        modules::academics::controller::portal_timetable,
        modules::academics::controller::portal_materials,
        modules::library::controller::create_book_request,
        modules::library::controller::list_book_requests,
        modules::library::controller::approve_book_request,
        modules::library::controller::reject_book_request,
        modules::library::controller::cancel_book_request,
        modules::library::controller::list_issue_records,
        modules::library::controller::return_issue,
        modules::hostel::controller::create_allocation,
        modules::hostel::controller::list_allocations,
        modules::hostel::controller::release_allocation,
        modules::hostel::controller::create_outpass,
        modules::hostel::controller::list_outpasses,
        modules::hostel::controller::approve_outpass,
        modules::hostel::controller::reject_outpass,
        modules::hostel::controller::cancel_outpass,
        modules::leaves::controller::create_leave_request,
        modules::leaves::controller::list_leave_requests,
        modules::leaves::controller::approve_leave_request,
        modules::leaves::controller::reject_leave_request,
        modules::leaves::controller::cancel_leave_request,
        modules::children::controller::list_children,
        modules::children::controller::child_leave_history,
        modules::children::controller::child_outpass_history,
    ),
    components(schemas(
        modules::auth::model::LoginRequest,
        modules::auth::model::LoginResponse,
        modules::auth::model::WhoAmI,
        modules::auth::model::ErrorResponse,
        modules::users::model::User,
        modules::users::model::UserRole,
        modules::schools::model::School,
        modules::schools::model::CreateSchoolDto,
        modules::schools::model::SchoolWithAdmin,
        modules::students::model::Student,
        modules::students::model::CreateStudentDto,
        modules::students::model::UpdateStudentDto,
        modules::students::model::PaginatedStudentsResponse,
        modules::classes::model::Class,
        modules::classes::model::CreateClassDto,
        modules::academics::model::TimetableEntry,
        modules::academics::model::CreateTimetableEntryDto,
        modules::academics::model::StudyMaterial,
        modules::academics::model::CreateStudyMaterialDto,
        modules::library::model::BookRequest,
        modules::library::model::CreateBookRequestDto,
        modules::library::model::IssueRecord,
        modules::hostel::model::HostelAllocation,
        modules::hostel::model::CreateAllocationDto,
        modules::hostel::model::HostelOutpass,
        modules::hostel::model::CreateOutpassDto,
        modules::leaves::model::LeaveRequest,
        modules::leaves::model::CreateLeaveRequestDto,
        PaginationParams,
        PaginationMeta,
        RequestStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication and identity"),
        (name = "Schools", description = "Tenant provisioning (super admin)"),
        (name = "Students", description = "Student records (school admin)"),
        (name = "Classes", description = "Canonical class records"),
        (name = "Academics", description = "Timetable and study materials"),
        (name = "Portal", description = "Student self-service"),
        (name = "Library", description = "Book requests and issue records"),
        (name = "Hostel", description = "Allocations and outpasses"),
        (name = "Leaves", description = "Leave requests"),
        (name = "Children", description = "Parent portal"),
    ),
    info(
        title = "Slateboard API",
        description = "Multi-tenant school administration REST API"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
