use axum::http::StatusCode;
use bloglist_core::error_builder::{
    bad_request, conflict, forbidden, internal_server_error, not_found, unauthorized,
    ErrorBuilder, ProblemKind,
};

#[test]
fn test_error_builder_fills_kind_defaults() {
    let error = ErrorBuilder::new(ProblemKind::BadRequest).build();

    assert_eq!(error.status_code, StatusCode::BAD_REQUEST);
    assert_eq!(error.body["type"], "https://bloglist.dev/probs/bad-request");
    assert_eq!(error.body["title"], "Bad Request");
    assert_eq!(error.body["error_code"], "BAD_REQUEST");
    assert!(error.body.contains_key("timestamp"));
    assert!(!error.body.contains_key("detail"));
}

#[test]
fn test_error_builder_overrides_and_values() {
    let error = bad_request()
        .title("Validation Error")
        .detail("`title` is required")
        .value("error", "`title` is required")
        .value("field", "title")
        .build();

    assert_eq!(error.body["title"], "Validation Error");
    assert_eq!(error.body["detail"], "`title` is required");
    assert_eq!(error.body["error"], "`title` is required");
    assert_eq!(error.body["field"], "title");
}

#[test]
fn test_internal_server_error_builder() {
    let error = internal_server_error().build();

    assert_eq!(error.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error.body["type"],
        "https://bloglist.dev/probs/internal-server-error"
    );
    assert_eq!(error.body["error_code"], "INTERNAL_SERVER_ERROR");
    assert!(error.body.contains_key("detail"));
}

#[test]
fn test_not_found_builder_detail_override() {
    let error = not_found().detail("Blog 123 was not found").build();

    assert_eq!(error.status_code, StatusCode::NOT_FOUND);
    assert_eq!(error.body["title"], "Resource Not Found");
    assert_eq!(error.body["detail"], "Blog 123 was not found");
    assert_eq!(error.body["error_code"], "NOT_FOUND");
}

#[test]
fn test_status_codes_of_common_builders() {
    assert_eq!(unauthorized().build().status_code, StatusCode::UNAUTHORIZED);
    assert_eq!(forbidden().build().status_code, StatusCode::FORBIDDEN);
    assert_eq!(conflict().build().status_code, StatusCode::CONFLICT);
    assert_eq!(ProblemKind::Forbidden.status(), StatusCode::FORBIDDEN);
}
