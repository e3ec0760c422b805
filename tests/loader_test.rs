mod common;

use common::{event_line, write_events};
use ecommerce_behavior::data::{clean, count_by_event_type, load_events, LoadError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_row_cap_limits_loaded_rows() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..20)
        .map(|i| event_line("view", Some("apple"), i))
        .collect();
    let path = write_events(&dir, "capped.csv", &lines);

    assert_eq!(load_events(&path, 7).unwrap().height(), 7);
    assert_eq!(load_events(&path, 1_000).unwrap().height(), 20);
}

#[test]
fn test_typed_columns_after_load() {
    let dir = TempDir::new().unwrap();
    let path = write_events(&dir, "typed.csv", &[event_line("purchase", Some("sony"), 3)]);

    let table = load_events(&path, 10).unwrap();
    let record = &table.records(1).unwrap()[0];
    assert_eq!(record.event_type, "purchase");
    assert_eq!(record.product_id, 1004856);
    assert_eq!(record.category_id, 2053013555631882655);
    assert_eq!(record.brand.as_deref(), Some("sony"));
    assert!((record.price - 130.76).abs() < 1e-9);
    assert_eq!(record.user_session, "sess-3");
}

#[test]
fn test_malformed_numbers_are_skipped() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        event_line("view", Some("apple"), 1),
        "2019-11-01 00:00:02 UTC,view,not-a-number,2053013555631882655,electronics.smartphone,apple,130.76,2,sess-2".to_string(),
        "2019-11-01 00:00:03 UTC,view,1004856,2053013555631882655,electronics.smartphone,apple,cheap,3,sess-3".to_string(),
        event_line("view", Some("apple"), 4),
    ];
    let path = write_events(&dir, "malformed.csv", &lines);

    let table = load_events(&path, 100).unwrap();
    let users: Vec<i64> = table
        .records(10)
        .unwrap()
        .into_iter()
        .map(|r| r.user_id)
        .collect();
    assert_eq!(users, vec![1, 4]);
}

#[test]
fn test_empty_fields_load_as_missing() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        event_line("view", None, 1),
        "2019-11-01 00:00:02 UTC,view,1004856,2053013555631882655,,apple,,2,sess-2".to_string(),
        event_line("view", Some("apple"), 3),
    ];
    let path = write_events(&dir, "gaps.csv", &lines);

    let table = load_events(&path, 100).unwrap();
    assert_eq!(table.height(), 3);
    assert_eq!(table.dataframe().column("brand").unwrap().null_count(), 1);
    assert_eq!(table.dataframe().column("price").unwrap().null_count(), 1);
    assert_eq!(clean(&table).unwrap().height(), 1);
}

#[test]
fn test_rows_with_extra_fields_are_skipped() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        event_line("view", Some("apple"), 1),
        format!("{},EXTRA,FIELD", event_line("view", Some("apple"), 2)),
        "2019-11-01 00:00:03 UTC,view,1004856,2053013555631882655,electronics.smartphone,apple,130.76".to_string(),
        event_line("view", Some("apple"), 4),
    ];
    let path = write_events(&dir, "ragged.csv", &lines);

    let table = load_events(&path, 100).unwrap();
    assert_eq!(table.height(), 3);
    let user_id = table.dataframe().column("user_id").unwrap();
    assert_eq!(user_id.null_count(), 1);
    assert!(user_id.i64().unwrap().into_iter().flatten().all(|id| id != 2));

    let counts = count_by_event_type(&clean(&table).unwrap()).unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts.get("view"), 2);
}

#[test]
fn test_na_markers_load_as_missing() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        "2019-11-01 00:00:01 UTC,view,1004856,2053013555631882655,electronics.smartphone,apple,nan,1,sess-1".to_string(),
        event_line("view", Some("NA"), 2),
        event_line("view", Some("null"), 3),
        event_line("view", Some("apple"), 4),
    ];
    let path = write_events(&dir, "markers.csv", &lines);

    let table = load_events(&path, 100).unwrap();
    assert_eq!(table.height(), 4);
    assert_eq!(table.dataframe().column("price").unwrap().null_count(), 1);
    assert_eq!(table.dataframe().column("brand").unwrap().null_count(), 2);

    let cleaned = clean(&table).unwrap();
    let users: Vec<i64> = cleaned
        .records(10)
        .unwrap()
        .into_iter()
        .map(|r| r.user_id)
        .collect();
    assert_eq!(users, vec![4]);
}

#[test]
fn test_header_only_file_is_empty_table() {
    let dir = TempDir::new().unwrap();
    let path = write_events(&dir, "empty.csv", &[]);
    assert!(load_events(&path, 100).unwrap().is_empty());
}

#[test]
fn test_wrong_header_is_schema_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wrong.csv");
    fs::write(&path, "time,type,product\n1,view,2\n").unwrap();

    match load_events(&path, 100) {
        Err(LoadError::SchemaMismatch { found, expected, .. }) => {
            assert_eq!(found, vec!["time", "type", "product"]);
            assert_eq!(expected.len(), 9);
        }
        other => panic!("expected schema mismatch, got {:?}", other),
    }
}

#[test]
fn test_quoted_header_names_follow_csv_rules() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quoted.csv");
    fs::write(
        &path,
        "event_time,event_type,product_id,category_id,category_code,\"brand,name\",price,user_id,user_session\n",
    )
    .unwrap();

    match load_events(&path, 100) {
        Err(LoadError::SchemaMismatch { found, .. }) => {
            assert_eq!(found.len(), 9);
            assert_eq!(found[5], "brand,name");
        }
        other => panic!("expected schema mismatch, got {:?}", other),
    }
}

#[test]
fn test_bom_and_quoted_exact_header_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bom.csv");
    let text = format!(
        "\u{feff}\"event_time\",\"event_type\",product_id,category_id,category_code,brand,price,user_id,user_session\n{}\n",
        event_line("cart", Some("bosch"), 5)
    );
    fs::write(&path, text).unwrap();

    let table = load_events(&path, 100).unwrap();
    assert_eq!(table.records(1).unwrap()[0].brand.as_deref(), Some("bosch"));
}

#[test]
fn test_empty_file_is_schema_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.csv");
    fs::write(&path, "").unwrap();
    assert!(matches!(
        load_events(&path, 100),
        Err(LoadError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = load_events(dir.path().join("nope.csv"), 100).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
    assert!(err.to_string().contains("nope.csv"));
}
