//! Reader for the published retail bond dataset workbook.
//!
//! Every sheet is scanned for a header row holding a series column
//! (`Seria`/`Series`). The remaining columns are recognised by header
//! keywords: ISIN, sale start, sale end and the per-period interest rates
//! (in sheet order). Rows whose series cell is not a valid series name are
//! skipped, so notes and blank lines around the table are harmless.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::{BondMaker, BondMakerBuilder, SeriesTable};
use crate::errors::{BondError, Result};
use crate::models::BondSeries;

/// Builds a [`SeriesTable`] from the dataset workbook (`.xls`, `.xlsx`, `.ods`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookBondMakerBuilder;

impl BondMakerBuilder for WorkbookBondMakerBuilder {
    fn build(&self, dataset: &Path) -> Result<Arc<dyn BondMaker>> {
        Ok(Arc::new(read_workbook(dataset)?))
    }
}

/// Reads every sheet of the workbook at `path` into a [`SeriesTable`].
pub fn read_workbook(path: &Path) -> Result<SeriesTable> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| BondError::Workbook(e.to_string()))?;

    let mut series = Vec::new();
    for sheet in workbook.sheet_names().to_vec() {
        let range = match workbook.worksheet_range(&sheet) {
            Ok(range) => range,
            Err(e) => {
                log::warn!("Skipping sheet '{}': {}", sheet, e);
                continue;
            }
        };
        let parsed = parse_rows(range.rows());
        log::debug!("Sheet '{}': {} series", sheet, parsed.len());
        series.extend(parsed);
    }

    if series.is_empty() {
        return Err(BondError::EmptyDataset);
    }
    log::info!("Loaded {} bond series from {}", series.len(), path.display());
    Ok(SeriesTable::new(series))
}

#[derive(Debug, Default, PartialEq)]
struct Columns {
    name: usize,
    isin: Option<usize>,
    sale_start: Option<usize>,
    sale_end: Option<usize>,
    rates: Vec<usize>,
}

impl Columns {
    /// Recognises a header row; `None` when the row has no series column.
    fn detect(row: &[Data]) -> Option<Self> {
        let headers: Vec<String> = row.iter().map(|cell| header_text(cell)).collect();
        let name = headers
            .iter()
            .position(|h| h == "seria" || h == "series" || h.starts_with("seria "))?;

        let mut columns = Columns {
            name,
            ..Default::default()
        };
        for (idx, header) in headers.iter().enumerate() {
            if idx == name || header.is_empty() {
                continue;
            }
            if header.contains("isin") {
                columns.isin = Some(idx);
            } else if ["początek", "poczatek", "rozpocz", "start"]
                .iter()
                .any(|k| header.contains(k))
            {
                columns.sale_start = Some(idx);
            } else if ["koniec", "zakończ", "zakoncz", "end"]
                .iter()
                .any(|k| header.contains(k))
            {
                columns.sale_end = Some(idx);
            } else if ["oprocentowanie", "rate", "%"]
                .iter()
                .any(|k| header.contains(k))
            {
                columns.rates.push(idx);
            }
        }
        Some(columns)
    }
}

/// Parses one sheet's rows into bond series.
pub(crate) fn parse_rows<'a>(rows: impl Iterator<Item = &'a [Data]>) -> Vec<BondSeries> {
    let mut columns: Option<Columns> = None;
    let mut series = Vec::new();

    for row in rows {
        if columns.is_none() {
            columns = Columns::detect(row);
            continue;
        }
        let Some(cols) = columns.as_ref() else {
            continue;
        };

        let Some(name) = row.get(cols.name).map(cell_text) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        // Rates are published period by period: stop at the first gap.
        let rates: Vec<Decimal> = cols
            .rates
            .iter()
            .map_while(|&idx| row.get(idx).and_then(cell_rate))
            .collect();

        let parsed = match BondSeries::new(&name, rates) {
            Ok(parsed) => parsed,
            Err(_) => {
                log::trace!("Skipping row with series cell '{}'", name);
                continue;
            }
        };

        let cell_at = |idx: Option<usize>| idx.and_then(|i| row.get(i));
        let mut parsed = parsed.with_sale_window(
            cell_at(cols.sale_start).and_then(cell_date),
            cell_at(cols.sale_end).and_then(cell_date),
        );
        if let Some(isin) = cell_at(cols.isin).map(cell_text).filter(|s| !s.is_empty()) {
            parsed = parsed.with_isin(isin);
        }
        series.push(parsed);
    }

    series
}

fn header_text(cell: &Data) -> String {
    cell_text(cell).to_lowercase()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Annual rate in percent. Text cells may carry a `%` sign and a decimal comma.
fn cell_rate(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) => Decimal::try_from(*f).ok().map(|d| d.round_dp(4)),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => {
            let cleaned = s.trim().trim_end_matches('%').trim().replace(',', ".");
            if cleaned.is_empty() {
                None
            } else {
                Decimal::from_str(&cleaned).ok()
            }
        }
        _ => None,
    }
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) | Data::String(s) => parse_date(s),
        Data::Float(serial) => excel_serial_date(*serial),
        Data::Int(serial) => excel_serial_date(*serial as f64),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(|c| c == 'T' || c == ' ').next().unwrap_or(raw);
    ["%Y-%m-%d", "%d.%m.%Y", "%d-%m-%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::days(serial as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn parse(rows: &[Vec<Data>]) -> Vec<BondSeries> {
        parse_rows(rows.iter().map(|r| r.as_slice()))
    }

    #[test]
    fn test_detect_columns() {
        let header = vec![
            s("Seria"),
            s("Kod ISIN"),
            s("Początek sprzedaży"),
            s("Koniec sprzedaży"),
            s("Oprocentowanie I okres"),
            s("Oprocentowanie II okres"),
        ];
        let cols = Columns::detect(&header).unwrap();
        assert_eq!(
            cols,
            Columns {
                name: 0,
                isin: Some(1),
                sale_start: Some(2),
                sale_end: Some(3),
                rates: vec![4, 5],
            }
        );
    }

    #[test]
    fn test_parse_rows_skips_preamble_and_notes() {
        let rows = vec![
            vec![s("Obligacje EDO"), Data::Empty],
            vec![s("Seria"), s("ISIN"), s("Oprocentowanie 1"), s("Oprocentowanie 2")],
            vec![s("EDO0134"), s("PL0000116279"), Data::Float(6.8), s("5,25%")],
            vec![s("EDO0234"), Data::Empty, Data::Float(6.6), Data::Empty],
            vec![s("* stopy procentowe w skali roku"), Data::Empty],
        ];
        let series = parse(&rows);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "EDO0134");
        assert_eq!(series[0].isin.as_deref(), Some("PL0000116279"));
        assert_eq!(series[0].rates, vec![dec!(6.8), dec!(5.25)]);
        assert_eq!(series[1].isin, None);
        assert_eq!(series[1].rates, vec![dec!(6.6)]);
    }

    #[test]
    fn test_rates_stop_at_first_gap() {
        let rows = vec![
            vec![s("Seria"), s("Rate 1"), s("Rate 2"), s("Rate 3")],
            vec![s("ROS0130"), Data::Float(7.0), Data::Empty, Data::Float(5.0)],
        ];
        assert_eq!(parse(&rows)[0].rates, vec![dec!(7.0)]);
    }

    #[test]
    fn test_sale_window_dates() {
        let rows = vec![
            vec![s("Series"), s("Sale start"), s("Sale end"), s("Rate")],
            vec![s("COI0128"), s("01.01.2024"), s("2024-01-31"), Data::Float(6.55)],
        ];
        let series = &parse(&rows)[0];
        assert_eq!(series.sale_start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(series.sale_end, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn test_sheet_without_header_yields_nothing() {
        let rows = vec![vec![s("EDO0134"), Data::Float(6.8)]];
        assert!(parse(&rows).is_empty());
    }

    #[test]
    fn test_excel_serial_date() {
        assert_eq!(
            excel_serial_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(excel_serial_date(0.0), None);
    }

    #[test]
    fn test_read_workbook_missing_file() {
        let err = read_workbook(Path::new("/nonexistent/ds.xls")).unwrap_err();
        assert!(matches!(err, BondError::Workbook(_)));
    }
}
