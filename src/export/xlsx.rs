use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::model::{get_headers, task_to_row};
use crate::export::{TaskExport, notify_export_success};
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Columns written as numbers rather than text.
const NUMERIC_COLUMNS: &[&str] = &["id", "hours"];

/// XLSX export with banded rows, a frozen header and fitted column widths.
pub(crate) fn export_xlsx(rows: &[TaskExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Timesheet").map_err(to_export_error)?;

    let headers = get_headers();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, task) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in task_to_row(task).iter().enumerate() {
            let numeric = NUMERIC_COLUMNS.contains(&headers[col]);
            write_cell(worksheet, row, col as u16, value, band_color, numeric)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    // Totals row
    if !rows.is_empty() {
        let total_row = (rows.len() + 1) as u32;
        let hours_col = headers.iter().position(|h| *h == "hours").unwrap_or(6) as u16;
        let bold = Format::new().set_bold().set_border(FormatBorder::Thin);
        let total: f64 = rows.iter().map(|r| r.hours).sum();

        worksheet
            .write_with_format(total_row, hours_col.saturating_sub(1), "Total", &bold)
            .map_err(to_export_error)?;
        worksheet
            .write_with_format(total_row, hours_col, total, &bold.clone().set_num_format("0.00"))
            .map_err(to_export_error)?;
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", rows.len(), path);
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    s: &str,
    bg: Color,
    numeric: bool,
) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if let Some((num_format, serial)) = parse_to_excel_date(s) {
        worksheet
            .write_with_format(row, col, serial, &base.set_num_format(num_format))
            .map_err(to_export_error)?;
        return Ok(());
    }

    if numeric && let Ok(num) = s.parse::<f64>() {
        worksheet
            .write_with_format(row, col, num, &base.set_align(FormatAlign::Right))
            .map_err(to_export_error)?;
        return Ok(());
    }

    worksheet
        .write_with_format(row, col, s, &base)
        .map_err(to_export_error)?;
    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
