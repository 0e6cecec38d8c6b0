use crate::common::{User, sample_users};
use sheetrow::{CellValue, DuplicateLabelPolicy, Record, TranscodeError};
use sheetrow_common::MAX_ROW;
use sheetrow_workbook::{
    IoError, ReadOptions, SaveDestination, SpreadsheetReader, SpreadsheetWriter, UmyaAdapter,
    WriteOptions, encode_records, new_workbook, read_records_from_bytes, read_records_from_path,
};

#[derive(Debug, Default, Record)]
struct Clashing {
    #[tag(xlsx = "Key")]
    a: i64,
    #[tag(xlsx = "Key")]
    b: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Counter {
    #[tag(xlsx = "Signed")]
    signed: i64,
    #[tag(xlsx = "Unsigned")]
    unsigned: u64,
}

#[test]
fn large_integers_survive_round_trip() {
    let counters = vec![
        Counter {
            signed: i64::MAX,
            unsigned: 9_007_199_254_740_993,
        },
        Counter {
            signed: i64::MIN,
            unsigned: u64::MAX,
        },
        Counter {
            signed: -9_007_199_254_740_992,
            unsigned: 9_007_199_254_740_992,
        },
    ];
    let mut book = new_workbook(&counters, &WriteOptions::default()).unwrap();

    let rows = book.read_rows("Sheet1").unwrap();
    assert_eq!(rows[1], vec!["9223372036854775807", "9007199254740993"]);

    let bytes = book.save_to(SaveDestination::Bytes).unwrap().expect("bytes");
    let back: Vec<Counter> =
        read_records_from_bytes::<Counter, UmyaAdapter>(bytes, &ReadOptions::default()).unwrap();
    assert_eq!(back, counters);
}

#[test]
fn new_workbook_round_trips_through_bytes() {
    let users = sample_users();
    let mut book = new_workbook(&users, &WriteOptions::default()).unwrap();
    let bytes = book.save_to(SaveDestination::Bytes).unwrap().expect("bytes");

    let back: Vec<User> =
        read_records_from_bytes::<User, UmyaAdapter>(bytes, &ReadOptions::default()).unwrap();
    assert_eq!(back, users);
}

#[test]
fn header_and_cells_layout() {
    let options = WriteOptions::default().sheet_name("People");
    let mut book = new_workbook(&sample_users(), &options).unwrap();
    assert_eq!(book.sheet_names().unwrap(), vec!["People"]);

    let rows = book.read_rows("People").unwrap();
    assert_eq!(rows[0], vec!["ID", "Name", "Tags", "Active", "Joined"]);
    assert_eq!(rows[1], vec!["1", "Alice", "admin,ops", "TRUE", "44986"]);
    assert_eq!(rows[2], vec!["2", "Bob, Jr.", "", "FALSE"]);

    let code = book.with_spreadsheet(|wb| {
        wb.get_sheet_by_name("People")
            .and_then(|ws| ws.get_cell("E2"))
            .and_then(|cell| cell.get_style().get_number_format())
            .map(|format| format.get_format_code().to_string())
    });
    assert_eq!(code.as_deref(), Some("yyyy-mm-dd"));
}

#[test]
fn saves_to_path_and_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.xlsx");

    let mut book = new_workbook(&sample_users()[..1], &WriteOptions::default()).unwrap();
    book.save_to(SaveDestination::Path(&path)).unwrap();

    let mut reopened = UmyaAdapter::open_path(&path).unwrap();
    encode_records(&mut reopened, &sample_users(), &WriteOptions::default()).unwrap();
    assert!(reopened.save_to(SaveDestination::InPlace).unwrap().is_none());

    let back: Vec<User> =
        read_records_from_path::<User, UmyaAdapter>(&path, &ReadOptions::default()).unwrap();
    assert_eq!(back, sample_users());
}

#[test]
fn cells_land_at_their_a1_name() {
    let mut book = UmyaAdapter::new();
    book.create_sheet("Grid").unwrap();
    book.write_cell("Grid", 3, 28, CellValue::Text("here".into())).unwrap();
    let value = book.with_spreadsheet(|wb| {
        wb.get_sheet_by_name("Grid")
            .and_then(|ws| ws.get_cell("AB3"))
            .map(|cell| cell.get_value().into_owned())
    });
    assert_eq!(value.as_deref(), Some("here"));

    assert!(book.write_cell("Grid", MAX_ROW + 1, 1, CellValue::Int(1)).is_err());
    assert!(book.write_cell("Grid", 1, 0, CellValue::Int(1)).is_err());
}

#[test]
fn in_place_without_origin_fails() {
    let mut book = new_workbook(&sample_users(), &WriteOptions::default()).unwrap();
    assert!(book.save_to(SaveDestination::InPlace).is_err());
}

#[test]
fn rejected_duplicate_labels_write_nothing() {
    let options = WriteOptions {
        duplicate_labels: DuplicateLabelPolicy::Reject,
        ..WriteOptions::default()
    };
    let mut book = UmyaAdapter::new();
    let err = encode_records(&mut book, &[Clashing::default()], &options).unwrap_err();
    assert!(matches!(
        err,
        IoError::Transcode(TranscodeError::DuplicateLabel { .. })
    ));
    assert!(book.sheet_names().unwrap().is_empty());
}
