// Run with: `cargo test -p sheetrow-workbook --test umya`

use crate::common::{User, build_workbook, sample_users, users_fixture};
use sheetrow::TranscodeError;
use sheetrow_workbook::{
    IoError, ReadOptions, SpreadsheetReader, UmyaAdapter, decode_rows, read_records_from_path,
};

#[test]
fn reads_users_from_fixture() {
    let path = users_fixture();
    let users: Vec<User> =
        read_records_from_path::<User, UmyaAdapter>(&path, &ReadOptions::default())
            .expect("read users");
    assert_eq!(users, sample_users());
}

#[test]
fn raw_rows_keep_serials_and_boolean_text() {
    let path = users_fixture();
    let mut adapter = UmyaAdapter::open_path(&path).expect("open via umya");
    let rows = adapter.read_rows("Sheet1").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], vec!["1", "Alice", "admin,ops", "TRUE", "44986", "ignored"]);
    assert_eq!(rows[2], vec!["2", "Bob, Jr.", "", "FALSE"]);
}

#[test]
fn selects_sheet_by_name_and_index() {
    let path = build_workbook(|book| {
        let data = book.new_sheet("Data").unwrap();
        data.get_cell_mut("A1").set_value("ID");
        data.get_cell_mut("A2").set_value_number(42.0);
    });
    let mut adapter = UmyaAdapter::open_path(&path).unwrap();
    assert_eq!(adapter.sheet_names().unwrap(), vec!["Sheet1", "Data"]);

    let by_name: Vec<User> =
        decode_rows(&mut adapter, &ReadOptions::default().sheet("Data")).unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, 42);

    let by_index: Vec<User> =
        decode_rows(&mut adapter, &ReadOptions::default().sheet(1usize)).unwrap();
    assert_eq!(by_index, by_name);

    let first: Vec<User> = decode_rows(&mut adapter, &ReadOptions::default()).unwrap();
    assert!(first.is_empty());

    let missing = decode_rows::<User, _>(&mut adapter, &ReadOptions::default().sheet("Nope"));
    assert!(matches!(missing, Err(IoError::SheetNotFound(_))));
}

#[test]
fn decode_failure_reports_sheet_row() {
    let path = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut("A1").set_value("ID");
        sh.get_cell_mut("A2").set_value_number(1.0);
        sh.get_cell_mut("A3").set_value("abc");
    });
    let err =
        read_records_from_path::<User, UmyaAdapter>(&path, &ReadOptions::default()).unwrap_err();
    match err {
        IoError::Decode { sheet, row, source } => {
            assert_eq!(sheet, "Sheet1");
            assert_eq!(row, 3);
            assert!(matches!(source, TranscodeError::Conversion { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn garbage_bytes_fail_to_open() {
    let err = sheetrow_workbook::read_records_from_bytes::<User, UmyaAdapter>(
        b"not a zip".to_vec(),
        &ReadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::Open { .. }));
}
