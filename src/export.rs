//! Report output. The layout is a compatibility contract: no header, one
//! record per team, averages formatted to two decimals, `\n` terminated.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::AverageRow;

pub fn write_averages(rows: &[AverageRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for row in rows {
        let avg_total = format!("{:.2}", row.avg_total);
        let avg_own = format!("{:.2}", row.avg_own);
        let avg_opponent = format!("{:.2}", row.avg_opponent);
        writer.write_record([
            row.name.as_str(),
            avg_total.as_str(),
            avg_own.as_str(),
            avg_opponent.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("corners-scanner-{name}-{}", std::process::id()))
    }

    #[test]
    fn writes_headerless_two_decimal_rows() {
        let rows = vec![
            AverageRow {
                name: "X".to_string(),
                avg_total: 5.0,
                avg_own: 2.0,
                avg_opponent: 3.0,
            },
            AverageRow {
                name: "Y".to_string(),
                avg_total: 10.0 / 3.0,
                avg_own: 7.0 / 3.0,
                avg_opponent: 1.0,
            },
        ];
        let path = tmp_path("rows.csv");
        write_averages(&rows, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "X,5.00,2.00,3.00\nY,3.33,2.33,1.00\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn empty_report_is_still_written() {
        let path = tmp_path("empty.csv");
        write_averages(&[], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.is_empty());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn parent_directories_are_created() {
        let dir = tmp_path("nested");
        let path = dir.join("deep").join("out.csv");
        write_averages(&[], &path).unwrap();

        assert!(path.exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
