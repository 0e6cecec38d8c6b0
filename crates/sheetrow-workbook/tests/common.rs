#![allow(dead_code)]

use chrono::NaiveDate;
use sheetrow::Record;
use tempfile::TempPath;
use umya_spreadsheet::Spreadsheet;

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct User {
    #[tag(xlsx = "ID", csv = "id")]
    pub id: i64,
    #[tag(xlsx = "Name", csv = "name")]
    pub name: String,
    #[tag(xlsx = "Tags")]
    pub tags: Vec<String>,
    #[tag(xlsx = "Active")]
    pub active: bool,
    #[tag(xlsx = "Joined")]
    pub joined: Option<NaiveDate>,
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Alice".into(),
            tags: vec!["admin".into(), "ops".into()],
            active: true,
            joined: Some(ymd(2023, 3, 1)),
        },
        User {
            id: 2,
            name: "Bob, Jr.".into(),
            tags: vec![],
            active: false,
            joined: None,
        },
    ]
}

/// Build an xlsx file on disk from a fresh `Sheet1` workbook.
pub fn build_workbook(f: impl FnOnce(&mut Spreadsheet)) -> TempPath {
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    let path = tempfile::Builder::new()
        .suffix(".xlsx")
        .tempfile()
        .expect("temp file")
        .into_temp_path();
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write xlsx");
    path
}

/// Header plus two users on `Sheet1`, with an unmapped `Notes` column.
pub fn users_fixture() -> TempPath {
    build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        for (col, label) in ["ID", "Name", "Tags", "Active", "Joined", "Notes"]
            .into_iter()
            .enumerate()
        {
            sh.get_cell_mut((col as u32 + 1, 1)).set_value(label);
        }

        sh.get_cell_mut((1, 2)).set_value_number(1.0);
        sh.get_cell_mut((2, 2)).set_value("Alice");
        sh.get_cell_mut((3, 2)).set_value("admin,ops");
        sh.get_cell_mut((4, 2)).set_value_bool(true);
        sh.get_cell_mut((5, 2)).set_value_number(44986.0);
        let _ = sh
            .get_style_mut("E2")
            .get_number_format_mut()
            .set_format_code(umya_spreadsheet::NumberingFormat::FORMAT_DATE_XLSX14);
        sh.get_cell_mut((6, 2)).set_value("ignored");

        sh.get_cell_mut((1, 3)).set_value_number(2.0);
        sh.get_cell_mut((2, 3)).set_value("Bob, Jr.");
        sh.get_cell_mut((4, 3)).set_value_bool(false);
    })
}
