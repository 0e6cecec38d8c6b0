#![cfg(feature = "csv")]

use chrono::{NaiveDate, NaiveDateTime};
use sheetrow::{ConverterRegistry, Record, TranscodeError};
use sheetrow_workbook::{
    CsvAdapter, CsvReadOptions, CsvTrim, IoError, ReadOptions, SaveDestination, SpreadsheetReader,
    SpreadsheetWriter,
    WriteOptions, decode_rows, encode_records, read_records_from_bytes, read_records_from_reader,
};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Shipment {
    #[tag(csv = "ref")]
    reference: String,
    #[tag(csv = "qty")]
    quantity: u32,
    #[tag(csv = "codes")]
    codes: Vec<i64>,
    #[tag(csv = "shipped")]
    shipped: Option<NaiveDateTime>,
    #[tag(csv = "due")]
    due: NaiveDate,
}

fn csv_read() -> ReadOptions {
    ReadOptions::default().namespace("csv")
}

fn shipments() -> Vec<Shipment> {
    let due = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    vec![
        Shipment {
            reference: "A-1".into(),
            quantity: 3,
            codes: vec![10, -2],
            shipped: Some(due.and_hms_opt(8, 30, 0).unwrap()),
            due,
        },
        Shipment {
            reference: "B \"two\"".into(),
            quantity: 0,
            codes: vec![],
            shipped: None,
            due,
        },
    ]
}

#[test]
fn round_trips_with_textual_dates() {
    let mut csv = CsvAdapter::new();
    encode_records(&mut csv, &shipments(), &WriteOptions::default().namespace("csv")).unwrap();
    let bytes = csv.save_to(SaveDestination::Bytes).unwrap().unwrap();

    let text = String::from_utf8(bytes.clone()).unwrap();
    assert_eq!(
        text,
        "ref,qty,codes,shipped,due\n\
         A-1,3,\"10,-2\",2024-02-29 08:30:00,2024-02-29\n\
         \"B \"\"two\"\"\",0,,,2024-02-29\n"
    );

    let back: Vec<Shipment> =
        read_records_from_bytes::<Shipment, CsvAdapter>(bytes, &csv_read()).unwrap();
    assert_eq!(back, shipments());
}

#[test]
fn accepts_iso_and_offset_timestamps() {
    let data = "ref,due,shipped\nX,2024-01-05T00:00:00,2024-01-05T09:15:00+02:00\n";
    let source = Box::new(std::io::Cursor::new(data));
    let rows: Vec<Shipment> =
        read_records_from_reader::<Shipment, CsvAdapter>(source, &csv_read()).unwrap();
    assert_eq!(rows[0].due, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(
        rows[0].shipped.map(|t| t.format("%H:%M").to_string()).as_deref(),
        Some("09:15")
    );
}

#[test]
fn serial_converters_can_replace_textual_ones() {
    let data = b"ref,due\nX,45292\n".to_vec();
    let err =
        read_records_from_bytes::<Shipment, CsvAdapter>(data.clone(), &csv_read()).unwrap_err();
    assert!(matches!(
        err,
        IoError::Decode { row: 2, source: TranscodeError::Conversion { .. }, .. }
    ));

    let options = csv_read().converters(ConverterRegistry::default());
    let rows: Vec<Shipment> =
        read_records_from_bytes::<Shipment, CsvAdapter>(data, &options).unwrap();
    assert_eq!(rows[0].due, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn trimmed_tsv_input() {
    let read_options = CsvReadOptions {
        delimiter: b'\t',
        trim: CsvTrim::All,
    };
    let mut csv = CsvAdapter::open_bytes_with_options(
        b" ref \t qty \t due\n Z \t 7 \t 2024-03-01\n\n".to_vec(),
        read_options,
    )
    .unwrap();
    assert_eq!(csv.sheet_names().unwrap(), vec!["Sheet1"]);

    let rows: Vec<Shipment> = decode_rows(&mut csv, &csv_read()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reference, "Z");
    assert_eq!(rows[0].quantity, 7);
}

#[test]
fn blank_line_between_rows_is_a_default_record() {
    let data = b"ref,qty,due\nA,1,2024-01-01\n,,\nB,2,2024-01-02\n".to_vec();
    let rows: Vec<Shipment> =
        read_records_from_bytes::<Shipment, CsvAdapter>(data, &csv_read()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], Shipment::default());
    assert_eq!(rows[2].reference, "B");
}

#[test]
fn overflowing_quantity_is_a_row_error() {
    let data = b"ref,qty,due\nok,1,2024-01-01\nbad,-1,2024-01-01\n".to_vec();
    let err = read_records_from_bytes::<Shipment, CsvAdapter>(data, &csv_read()).unwrap_err();
    assert_eq!(err.row(), Some(3));
    assert!(err.to_string().contains("qty") || err.to_string().contains("quantity"));
}
