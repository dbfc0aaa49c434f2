use std::collections::HashSet;

use fsrv_web::status::Status;

#[test]
fn describes_well_known_codes() {
    assert_eq!(Status::describe(100), Some("Continue"));
    assert_eq!(Status::describe(200), Some("OK"));
    assert_eq!(Status::describe(204), Some("No Content"));
    assert_eq!(Status::describe(206), Some("Partial Content"));
    assert_eq!(Status::describe(301), Some("Moved Permanently"));
    assert_eq!(Status::describe(404), Some("Not Found"));
    assert_eq!(Status::describe(416), Some("Range Not Satisfiable"));
    assert_eq!(Status::describe(418), Some("I'm a teapot"));
    assert_eq!(Status::describe(500), Some("Internal Server Error"));
    assert_eq!(Status::describe(511), Some("Network Authentication Required"));
}

#[test]
fn unknown_codes_are_not_described() {
    assert_eq!(Status::describe(0), None);
    assert_eq!(Status::describe(99), None);
    assert_eq!(Status::describe(299), None);
    assert_eq!(Status::describe(499), None);
    assert_eq!(Status::describe(600), None);
    assert_eq!(Status::describe(999), None);
    assert_eq!(Status::describe(u16::MAX), None);
}

#[test]
fn deprecated_proxy_codes_are_absent() {
    assert_eq!(Status::describe(305), None);
    assert_eq!(Status::describe(306), None);
}

#[test]
fn no_range_based_fallback() {
    // an unrecognized 4xx code must not borrow a neighbor's phrase
    assert_eq!(Status::describe(444), None);
    assert!(Status::from_code(444).is_none());
}

#[test]
fn standard_set_is_complete_and_distinct() {
    let all: Vec<Status> = Status::standard().collect();
    assert_eq!(all.len(), 61);

    let codes: HashSet<u16> = all.iter().map(|status| status.code).collect();
    assert_eq!(codes.len(), 61);

    for status in &all {
        assert!(status.code >= 100 && status.code <= 599);
        assert!(!status.reason.is_empty());
    }
}

#[test]
fn enumeration_is_stable_and_ascending() {
    let first: Vec<u16> = Status::standard().map(|status| status.code).collect();
    let second: Vec<u16> = Status::standard().map(|status| status.code).collect();
    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first, sorted);
}

#[test]
fn round_trip_through_describe() {
    for status in Status::standard() {
        assert_eq!(Status::describe(status.code), Some(status.reason.as_str()));
    }
}

#[test]
fn describe_is_idempotent() {
    for _ in 0..3 {
        assert_eq!(Status::describe(404), Some("Not Found"));
        assert_eq!(Status::describe(999), None);
    }
}

#[test]
fn from_code_carries_the_catalog_phrase() {
    let status = Status::from_code(503).unwrap();
    assert_eq!(status.code, 503);
    assert_eq!(status.reason, "Service Unavailable");
}

#[test]
fn custom_statuses_are_the_callers_business() {
    let status = Status::custom(799, "Something Else".to_owned());
    assert_eq!(status.code, 799);
    assert_eq!(status.reason, "Something Else");
    // making one by hand doesn't sneak it into the catalog
    assert_eq!(Status::describe(799), None);
}
