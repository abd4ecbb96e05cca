//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over ledger commands from a CSV source.
//! Supports batch reading for the concurrent batch processor.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerCommand, LedgerError};
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;

fn parse_error(error: csv_async::Error) -> LedgerError {
    LedgerError::ParseError {
        line: error.position().map(|pos| pos.line()),
        message: error.to_string(),
    }
}

/// Asynchronous CSV reader
///
/// Maintains streaming behavior with constant memory usage per batch.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    headers: Option<StringRecord>,
    record: StringRecord,
    skipped: Vec<LedgerError>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            headers: None,
            record: StringRecord::new(),
            skipped: Vec::new(),
        }
    }

    /// Read a batch of ledger commands
    ///
    /// Reads rows until `batch_size` valid commands are collected or the
    /// input ends. Rows that fail to parse are skipped and kept for
    /// [`take_skipped`](Self::take_skipped), tagged with the line their
    /// record starts on. An I/O error ends the input.
    ///
    /// # Returns
    ///
    /// The converted commands in input order. An empty vector means the end
    /// of the input was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerCommand> {
        let mut batch = Vec::with_capacity(batch_size);

        if self.headers.is_none() {
            match self.csv_reader.headers().await {
                Ok(headers) => self.headers = Some(headers.clone()),
                Err(e) => {
                    self.skipped.push(parse_error(e));
                    return batch;
                }
            }
        }

        while batch.len() < batch_size {
            match self.csv_reader.read_record(&mut self.record).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    let fatal = matches!(e.kind(), csv_async::ErrorKind::Io(_));
                    self.skipped.push(parse_error(e));
                    if fatal {
                        break;
                    }
                    continue;
                }
            }

            // Line where the record starts; quoted fields may span lines.
            let line = self.record.position().map_or(0, |pos| pos.line());

            let command = self
                .record
                .deserialize::<CsvRecord>(self.headers.as_ref())
                .map_err(parse_error)
                .and_then(convert_csv_record);

            match command {
                Ok(command) => batch.push(command),
                Err(e) => self.skipped.push(e.at_line(line)),
            }
        }

        batch
    }

    /// Drain the errors of rows skipped since the last call
    pub fn take_skipped(&mut self) -> Vec<LedgerError> {
        std::mem::take(&mut self.skipped)
    }
}
