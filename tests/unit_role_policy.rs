use caredesk::middleware::role::is_allowed;
use caredesk::modules::users::model::UserRole;

#[test]
fn unauthenticated_style_empty_requirement_passes_any_user() {
    assert!(is_allowed(&[UserRole::Patient], &[]));
    assert!(is_allowed(&[UserRole::Admin], &[]));
    assert!(is_allowed(&[], &[]));
}

#[test]
fn user_with_no_roles_fails_any_requirement() {
    assert!(!is_allowed(&[], &[UserRole::Patient]));
    assert!(!is_allowed(&[], &[UserRole::Admin, UserRole::Doctor]));
}

#[test]
fn single_matching_role_passes() {
    assert!(is_allowed(&[UserRole::Doctor], &[UserRole::Doctor]));
    assert!(is_allowed(&[UserRole::Admin], &[UserRole::Admin]));
}

#[test]
fn any_overlap_is_sufficient() {
    assert!(is_allowed(
        &[UserRole::Nurse],
        &[UserRole::Admin, UserRole::Doctor, UserRole::Nurse]
    ));
    assert!(is_allowed(
        &[UserRole::Patient, UserRole::Doctor],
        &[UserRole::Doctor]
    ));
}

#[test]
fn patient_cannot_reach_staff_routes() {
    let staff = [UserRole::Admin, UserRole::Doctor, UserRole::Nurse];
    assert!(!is_allowed(&[UserRole::Patient], &staff));
}

#[test]
fn doctor_is_not_an_admin() {
    assert!(!is_allowed(&[UserRole::Doctor], &[UserRole::Admin]));
    assert!(!is_allowed(
        &[UserRole::Doctor, UserRole::Nurse],
        &[UserRole::Admin]
    ));
}
