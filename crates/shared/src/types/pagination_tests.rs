use super::*;
use rstest::rstest;

#[test]
fn test_defaults_apply_to_missing_query_fields() {
    let request: PageRequest = serde_json::from_str("{}").unwrap();
    assert_eq!((request.page, request.per_page), (1, 20));

    let request: PageRequest = serde_json::from_str(r#"{"page": 4}"#).unwrap();
    assert_eq!((request.page, request.per_page), (4, 20));
    assert_eq!(request.offset(), 60);
    assert_eq!(request.limit(), 20);
}

#[rstest]
#[case(0, 1000, 1, MAX_PER_PAGE)]
#[case(3, 0, 3, 1)]
#[case(2, 50, 2, 50)]
fn test_normalized(
    #[case] page: u32,
    #[case] per_page: u32,
    #[case] expected_page: u32,
    #[case] expected_per_page: u32,
) {
    let request = PageRequest { page, per_page }.normalized();
    assert_eq!(request.page, expected_page);
    assert_eq!(request.per_page, expected_per_page);
}

#[rstest]
#[case(0, 1)]
#[case(9, 1)]
#[case(10, 1)]
#[case(25, 3)]
#[case(30, 3)]
fn test_total_pages(#[case] total: u64, #[case] expected: u32) {
    let response: PageResponse<u8> = PageResponse::new(vec![], 1, 10, total);
    assert_eq!(response.meta.total_pages, expected);
    assert_eq!(response.meta.total, total);
}
