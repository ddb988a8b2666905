//! Fixed-width record writer.
//!
//! Fields are appended as sanitized text, so every character in the buffer
//! is representable in Windows-1251 and takes exactly one byte once encoded.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use dds_shared::types::round_currency;

use crate::export::encoding;
use crate::export::error::{ExportError, ExportWarning, WarningKind};
use crate::export::layout::widths;
use crate::vat::CreditCoefficient;

const RECORD_END: &str = "\r\n";

/// Builds one file record by record.
#[derive(Debug, Default)]
pub struct RecordWriter {
    buffer: String,
    record: usize,
    warnings: Vec<ExportWarning>,
}

impl RecordWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the next record. Records are numbered from 1.
    pub fn begin_record(&mut self) {
        self.record += 1;
    }

    /// Terminates the current record with CRLF.
    pub fn end_record(&mut self) {
        self.buffer.push_str(RECORD_END);
    }

    /// Number of records started so far.
    #[must_use]
    pub fn records(&self) -> usize {
        self.record
    }

    /// Writes left-aligned, space-padded text.
    ///
    /// Control characters become spaces, characters outside Windows-1251
    /// become `?`, and overlong values are cut to `width`. The last two
    /// are reported as warnings.
    pub fn text(&mut self, field: &'static str, value: &str, width: usize) {
        let length = value.chars().count();
        if length > width {
            self.warn(field, WarningKind::Truncated { length, width });
        }

        let mut written = 0;
        for c in value.chars().take(width) {
            let c = if c.is_control() {
                ' '
            } else if encoding::is_representable(c) {
                c
            } else {
                self.warn(field, WarningKind::Unrepresentable { character: c });
                '?'
            };
            self.buffer.push(c);
            written += 1;
        }
        self.blank(width - written);
    }

    /// Writes `width` spaces.
    pub fn blank(&mut self, width: usize) {
        self.buffer.extend(std::iter::repeat_n(' ', width));
    }

    /// Writes a right-aligned, zero-padded integer.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::EncodingFailure` if the value needs more than
    /// `width` digits.
    pub fn integer(
        &mut self,
        field: &'static str,
        value: u64,
        width: usize,
    ) -> Result<(), ExportError> {
        let digits = value.to_string();
        if digits.len() > width {
            return Err(self.failure(field, format!("{value} does not fit in {width} digits")));
        }
        self.buffer.push_str(&format!("{digits:0>width$}"));
        Ok(())
    }

    /// Writes a currency amount: sign position, 11 integer digits, point,
    /// 2 decimals. The sign position holds `-` for negative amounts and
    /// `0` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::EncodingFailure` if the integer part needs more
    /// than 11 digits. Amounts are never truncated.
    pub fn amount(&mut self, field: &'static str, value: Decimal) -> Result<(), ExportError> {
        let rounded = round_currency(value);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            '-'
        } else {
            '0'
        };
        let magnitude = format!("{:.2}", rounded.abs());
        let (integer, fraction) = magnitude.split_once('.').unwrap_or((magnitude.as_str(), "00"));

        if integer.len() > widths::AMOUNT_DIGITS {
            return Err(self.failure(
                field,
                format!(
                    "{rounded} exceeds {} integer digits",
                    widths::AMOUNT_DIGITS
                ),
            ));
        }

        self.buffer.push(sign);
        self.buffer.push_str(&format!(
            "{integer:0>digits$}.{fraction}",
            digits = widths::AMOUNT_DIGITS
        ));
        Ok(())
    }

    /// Writes a credit coefficient as `0.000`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::EncodingFailure` if the rendered value is not
    /// exactly 5 characters wide.
    pub fn coefficient(
        &mut self,
        field: &'static str,
        value: CreditCoefficient,
    ) -> Result<(), ExportError> {
        let rendered = value.to_string();
        if rendered.len() != widths::COEFFICIENT {
            return Err(self.failure(field, format!("{rendered} is not a 0.000 coefficient")));
        }
        self.buffer.push_str(&rendered);
        Ok(())
    }

    /// Writes a date as `DD/MM/YYYY`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::EncodingFailure` for years outside four digits.
    pub fn date(&mut self, field: &'static str, value: NaiveDate) -> Result<(), ExportError> {
        let rendered = value.format("%d/%m/%Y").to_string();
        if rendered.len() != widths::DATE {
            return Err(self.failure(field, format!("{value} has no four-digit year")));
        }
        self.buffer.push_str(&rendered);
        Ok(())
    }

    /// Encodes the buffer and hands back the bytes with the warnings.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::EncodingFailure` if the buffer holds a
    /// character that cannot be encoded.
    pub fn finish(self) -> Result<(Vec<u8>, Vec<ExportWarning>), ExportError> {
        let bytes = encoding::encode(&self.buffer).ok_or_else(|| ExportError::EncodingFailure {
            record: self.record,
            field: "record",
            reason: "record contains characters outside Windows-1251".to_string(),
        })?;
        Ok((bytes, self.warnings))
    }

    fn warn(&mut self, field: &'static str, kind: WarningKind) {
        self.warnings.push(ExportWarning {
            record: self.record,
            field,
            kind,
        });
    }

    fn failure(&self, field: &'static str, reason: String) -> ExportError {
        ExportError::EncodingFailure {
            record: self.record,
            field,
            reason,
        }
    }
}
