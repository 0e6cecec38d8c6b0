// Run with: `cargo test -p sheetrow-workbook --features calamine --test calamine`

use crate::common::{User, build_workbook, sample_users, users_fixture, ymd};
use sheetrow::Record;
use sheetrow_common::DateSystem;
use sheetrow_workbook::{
    CalamineAdapter, IoError, ReadOptions, SpreadsheetReader, decode_rows, read_records_from_bytes,
    read_records_from_path,
};

#[derive(Debug, Default, PartialEq, Record)]
struct Event {
    #[tag(xlsx = "When")]
    when: chrono::NaiveDate,
}

#[test]
fn reads_users_from_fixture() {
    let path = users_fixture();
    let users: Vec<User> =
        read_records_from_path::<User, CalamineAdapter>(&path, &ReadOptions::default()).unwrap();
    assert_eq!(users, sample_users());
}

#[test]
fn date_cells_surface_as_serials() {
    let path = users_fixture();
    let mut adapter = CalamineAdapter::open_path(&path).unwrap();
    assert_eq!(adapter.sheet_names().unwrap(), vec!["Sheet1"]);
    let rows = adapter.read_rows("Sheet1").unwrap();
    assert_eq!(rows[1][3], "TRUE");
    assert_eq!(rows[1][4], "44986");
    assert_eq!(rows[2], vec!["2", "Bob, Jr.", "", "FALSE"]);
}

#[test]
fn date_system_override() {
    let path = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut("A1").set_value("When");
        sh.get_cell_mut("A2").set_value_number(0.0);
    });
    let bytes = std::fs::read(&path).unwrap();

    let options = ReadOptions {
        date_system: Some(DateSystem::Excel1904),
        ..ReadOptions::default()
    };
    let events: Vec<Event> =
        read_records_from_bytes::<Event, CalamineAdapter>(bytes.clone(), &options).unwrap();
    assert_eq!(events, vec![Event { when: ymd(1904, 1, 1) }]);

    let mut adapter = CalamineAdapter::open_bytes(bytes)
        .unwrap()
        .with_date_system(DateSystem::Excel1904);
    let events: Vec<Event> = decode_rows(&mut adapter, &ReadOptions::default()).unwrap();
    assert_eq!(events[0].when, ymd(1904, 1, 1));
}

#[test]
fn leading_blank_rows_keep_row_numbers() {
    let path = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut("A1").set_value("ID");
        sh.get_cell_mut("A5").set_value("nope");
    });
    let err = read_records_from_path::<User, CalamineAdapter>(&path, &ReadOptions::default())
        .unwrap_err();
    assert_eq!(err.row(), Some(5));
}

#[test]
fn rejects_non_workbook_bytes() {
    let bytes = b"plain text".to_vec();
    let err = read_records_from_bytes::<User, CalamineAdapter>(bytes, &ReadOptions::default())
        .unwrap_err();
    match err {
        IoError::Open { backend, .. } => assert_eq!(backend, "calamine"),
        other => panic!("unexpected error: {other}"),
    }
}
