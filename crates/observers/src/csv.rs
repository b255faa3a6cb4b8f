//! Append-only CSV persistence for sweep results.
//!
//! Every row is flushed and synced to disk before [`CsvSink::append`]
//! returns, so an interrupted sweep keeps every row it reported.
//!
//! The header is written only when the file is new or empty. Reopening a file
//! that already carries the expected header appends below the existing rows;
//! a file with any other first line is refused untouched. A trailing row left
//! without its newline by an interrupted write is dropped on reopen.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, warn};
use xy_core::{ResultSink, TemperatureResult};

/// The header line, without its newline.
pub const HEADER: &str = "temperature,dim_x,dim_y,mean_energy_per_spin,energy_per_spin_variance,\
specific_heat,vortex_density,r_hat,effective_sample_size,converged";

/// Errors that can occur when opening or appending to a CSV sink.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("{} starts with `{found}`, expected the sweep header", .path.display())]
    HeaderMismatch { path: PathBuf, found: String },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// A [`ResultSink`] that appends one CSV row per temperature.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    file: File,
    rows: usize,
}

impl CsvSink {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::HeaderMismatch`] if the file is non-empty and its
    /// first line is not [`HEADER`], or an I/O error if the file cannot be
    /// opened, read or written.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CsvError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| CsvError::Open {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(open_error)?;

        let is_empty = file.metadata().map_err(open_error)?.len() == 0;
        if is_empty {
            debug!(path = %path.display(), "writing csv header");
            write_line(&mut file, HEADER).map_err(|source| CsvError::Write {
                path: path.clone(),
                source,
            })?;
        } else {
            let mut first = String::new();
            BufReader::new(&file)
                .read_line(&mut first)
                .map_err(open_error)?;
            let found = first.trim_end_matches(['\n', '\r']);
            if found != HEADER {
                return Err(CsvError::HeaderMismatch {
                    path,
                    found: found.to_owned(),
                });
            }
            let dropped = drop_torn_row(&mut file).map_err(|source| CsvError::Write {
                path: path.clone(),
                source,
            })?;
            if dropped > 0 {
                warn!(path = %path.display(), bytes = dropped, "dropped incomplete trailing row");
            }
            debug!(path = %path.display(), "appending to existing csv");
        }

        Ok(Self {
            path,
            file,
            rows: 0,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of rows appended through this sink.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl ResultSink for CsvSink {
    type Error = CsvError;

    fn append(&mut self, result: &TemperatureResult) -> Result<(), Self::Error> {
        write_line(&mut self.file, &format_row(result)).map_err(|source| CsvError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.rows += 1;
        Ok(())
    }
}

/// Formats one result as a CSV row, without its newline.
#[must_use]
pub fn format_row(r: &TemperatureResult) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{}",
        r.temperature,
        r.dim_x,
        r.dim_y,
        r.mean_energy_per_spin,
        r.energy_per_spin_variance,
        r.specific_heat,
        r.vortex_density,
        r.r_hat,
        r.effective_sample_size,
        r.is_converged(),
    )
}

fn write_line(file: &mut File, line: &str) -> io::Result<()> {
    file.write_all(format!("{line}\n").as_bytes())?;
    file.flush()?;
    file.sync_data()
}

/// Truncates a non-empty file back to its last newline.
///
/// Returns the number of bytes removed. A file with no newline at all keeps
/// its content and gets a newline appended instead.
fn drop_torn_row(file: &mut File) -> io::Result<u64> {
    let len = file.metadata()?.len();
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(0);
    }

    let mut contents = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut contents)?;
    match contents.iter().rposition(|&b| b == b'\n') {
        Some(end) => {
            let keep = end as u64 + 1;
            file.set_len(keep)?;
            file.sync_data()?;
            Ok(len - keep)
        }
        None => {
            file.write_all(b"\n")?;
            file.sync_data()?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use xy_core::ConvergenceWarning;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("xy_csv_{}_{name}.csv", std::process::id()));
        fs::remove_file(&path).ok();
        path
    }

    fn result(temperature: f64) -> TemperatureResult {
        TemperatureResult {
            temperature,
            dim_x: 4,
            dim_y: 4,
            mean_energy_per_spin: -1.5,
            energy_per_spin_variance: 0.25,
            specific_heat: 2.0,
            vortex_density: 0.125,
            r_hat: 1.0,
            effective_sample_size: 800.0,
            warning: None,
        }
    }

    #[test]
    fn new_file_gets_header_and_rows() {
        let path = temp_path("new");

        let mut sink = CsvSink::open(&path).expect("should create");
        sink.append(&result(0.5)).expect("should append");
        sink.append(&result(1.0)).expect("should append");

        let contents = fs::read_to_string(&path).expect("should read");
        fs::remove_file(&path).ok();

        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "0.5,4,4,-1.5,0.25,2,0.125,1,800,true");
        assert_eq!(sink.rows(), 2);
    }

    #[test]
    fn reopening_does_not_repeat_the_header() {
        let path = temp_path("reopen");

        CsvSink::open(&path)
            .and_then(|mut sink| sink.append(&result(0.5)))
            .expect("first run");
        CsvSink::open(&path)
            .and_then(|mut sink| sink.append(&result(1.0)))
            .expect("second run");

        let contents = fs::read_to_string(&path).expect("should read");
        fs::remove_file(&path).ok();

        assert_eq!(contents.matches("temperature,").count(), 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn empty_file_gets_a_header() {
        let path = temp_path("empty");
        fs::write(&path, "").expect("should create");

        CsvSink::open(&path).expect("should open");

        let contents = fs::read_to_string(&path).expect("should read");
        fs::remove_file(&path).ok();
        assert_eq!(contents, format!("{HEADER}\n"));
    }

    #[test]
    fn header_mismatch_leaves_file_untouched() {
        let path = temp_path("mismatch");
        let original = "temp,dim_x,dim_y,energy\n0.1,4,4,-2.0\n";
        fs::write(&path, original).expect("should create");

        let error = CsvSink::open(&path).expect_err("foreign header");

        let contents = fs::read_to_string(&path).expect("should read");
        fs::remove_file(&path).ok();

        assert!(matches!(
            error,
            CsvError::HeaderMismatch { ref found, .. } if found == "temp,dim_x,dim_y,energy"
        ));
        assert_eq!(contents, original);
    }

    #[test]
    fn torn_trailing_row_is_dropped_on_reopen() {
        let path = temp_path("torn");
        let kept = "0.1,4,4,-1.9,0.01,0.5,0,1,800,true";
        fs::write(&path, format!("{HEADER}\n{kept}\n0.15,4,4,-1.8")).expect("should create");

        CsvSink::open(&path)
            .and_then(|mut sink| sink.append(&result(0.2)))
            .expect("should append");

        let contents = fs::read_to_string(&path).expect("should read");
        fs::remove_file(&path).ok();

        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines, [HEADER, kept, "0.2,4,4,-1.5,0.25,2,0.125,1,800,true"]);
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn header_without_newline_is_completed() {
        let path = temp_path("bare_header");
        fs::write(&path, HEADER).expect("should create");

        CsvSink::open(&path)
            .and_then(|mut sink| sink.append(&result(0.3)))
            .expect("should append");

        let contents = fs::read_to_string(&path).expect("should read");
        fs::remove_file(&path).ok();

        assert_eq!(
            contents,
            format!("{HEADER}\n0.3,4,4,-1.5,0.25,2,0.125,1,800,true\n")
        );
    }

    #[test]
    fn warned_rows_are_marked_unconverged() {
        let mut warned = result(0.2);
        warned.r_hat = 1.3;
        warned.warning = Some(ConvergenceWarning {
            r_hat: 1.3,
            threshold: 1.1,
        });

        assert!(format_row(&warned).ends_with(",1.3,800,false"));
    }

    #[test]
    fn undefined_values_are_written_as_nan() {
        let mut row = result(0.2);
        row.specific_heat = f64::NAN;

        assert_eq!(format_row(&row).split(',').nth(5), Some("NaN"));
    }
}
