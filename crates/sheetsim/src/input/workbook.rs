//! Spreadsheet workbook reading (xlsx, xlsm, xlsb, xls, ods).

use std::io::Cursor;
use std::path::Path;

use calamine::{Reader, open_workbook_auto_from_rs};

/// Extensions read as workbooks rather than delimited text.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Workbook format implied by the path's extension, if any.
pub(crate) fn workbook_format(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    WORKBOOK_EXTENSIONS.iter().copied().find(|e| *e == ext)
}

/// Read one sheet of a workbook as display-string rows.
///
/// `sheet` selects a worksheet by name; the first sheet is used otherwise.
/// Errors are returned as text for the caller to wrap.
pub(crate) fn read_sheet(bytes: &[u8], sheet: Option<&str>) -> Result<Vec<Vec<String>>, String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| e.to_string())?;

    let range = match sheet {
        Some(name) => workbook.worksheet_range(name).map_err(|e| e.to_string())?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| "workbook has no sheets".to_string())?
            .map_err(|e| e.to_string())?,
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_format_by_extension() {
        assert_eq!(workbook_format(Path::new("orcamento.xlsx")), Some("xlsx"));
        assert_eq!(workbook_format(Path::new("ORCAMENTO.XLS")), Some("xls"));
        assert_eq!(workbook_format(Path::new("sheet.ods")), Some("ods"));
        assert_eq!(workbook_format(Path::new("data.csv")), None);
        assert_eq!(workbook_format(Path::new("noext")), None);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(read_sheet(b"Material,Quantidade\nAreia,10\n", None).is_err());
    }
}
