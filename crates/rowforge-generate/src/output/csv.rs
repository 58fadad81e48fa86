use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rowforge_core::{Dataset, TableRows};

use crate::errors::GenerationError;

/// Write one `<table>.csv` per table into `dir`; returns total bytes written.
pub fn write_dataset_csv(dir: &Path, data: &Dataset) -> Result<u64, GenerationError> {
    let mut bytes = 0;
    for table in &data.tables {
        let path = dir.join(format!("{}.csv", table.name));
        bytes += write_table_csv(&path, table)?;
    }
    Ok(bytes)
}

/// Write a table as CSV with a header row in field declaration order.
pub fn write_table_csv(path: &Path, table: &TableRows) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    if let Some(first) = table.rows.first() {
        writer.write_record(first.keys())?;
        for row in &table.rows {
            let record: Vec<String> = row.iter().map(|(_, value)| value.to_csv_field()).collect();
            writer.write_record(&record)?;
        }
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
