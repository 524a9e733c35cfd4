//! Spreadsheet export of the ledger.
//!
//! Every entry becomes one row of a single worksheet named `Ledger`, in the
//! order the entries are given. Money is written as numeric cells.

mod error;

pub use error::ExportError;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::ledger::Entry;

/// Worksheet name.
pub const SHEET_NAME: &str = "Ledger";

/// File name offered to the browser.
pub const FILE_NAME: &str = "ledger.xlsx";

/// Content type of the workbook.
pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Column headers, left to right.
pub const HEADERS: [&str; 8] = [
    "Date",
    "Name",
    "UID",
    "Amount",
    "Paid",
    "Due",
    "Expenditure",
    "Balance",
];

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow<'a> {
    /// Entry date.
    pub date: &'a str,
    /// Customer name.
    pub name: &'a str,
    /// Entry key.
    pub uid: &'a str,
    /// Money columns in header order: amount, paid, due, expenditure, balance.
    pub money: [Decimal; 5],
}

impl<'a> From<&'a Entry> for LedgerRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            date: &entry.date,
            name: &entry.name,
            uid: &entry.unique_id,
            money: [
                entry.amount,
                entry.paid,
                entry.due,
                entry.expenditure,
                entry.balance,
            ],
        }
    }
}

/// Builds the workbook for the given entries and returns the xlsx bytes.
///
/// # Errors
///
/// Returns an error if the workbook cannot be written.
pub fn write_ledger_workbook(entries: &[Entry]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    write_header(sheet)?;

    for (index, entry) in entries.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| ExportError::TooManyRows(entries.len()))?;
        write_row(sheet, row, &LedgerRow::from(entry))?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_header(sheet: &mut Worksheet) -> Result<(), ExportError> {
    let bold = Format::new().set_bold();
    for (col, header) in (0u16..).zip(HEADERS) {
        sheet.write_string_with_format(0, col, header, &bold)?;
    }
    Ok(())
}

fn write_row(sheet: &mut Worksheet, row: u32, data: &LedgerRow<'_>) -> Result<(), ExportError> {
    sheet.write_string(row, 0, data.date)?;
    sheet.write_string(row, 1, data.name)?;
    sheet.write_string(row, 2, data.uid)?;

    for (col, value) in (3u16..).zip(data.money) {
        sheet.write_number(row, col, value.to_f64().unwrap_or_default())?;
    }
    Ok(())
}
