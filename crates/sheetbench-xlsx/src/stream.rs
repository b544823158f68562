//! Streaming row reader

use std::io::{BufReader, Cursor, Read, Seek};
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheetbench_core::{serial_to_datetime, HeaderRows, RowIter, RowReader, SheetSource, Value};

use crate::error::{XlsxError, XlsxResult};
use crate::package;

/// Row reader that walks the first worksheet's XML one `<row>` at a time.
///
/// Cell typing follows read-only streaming workbooks: numbers without a
/// fraction or exponent are integers, and any number carrying a date format
/// becomes a [`Value::DateTime`], even when the time part is midnight.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxStreamReader;

impl RowReader for XlsxStreamReader {
    fn name(&self) -> &'static str {
        "xlsx_stream"
    }

    fn read(&self, source: SheetSource) -> sheetbench_core::Result<RowIter> {
        let records = SheetRecords::open(BufReader::new(source.into_file()))?;
        let records = records.map(|r| r.map_err(sheetbench_core::Error::from));
        Ok(Box::new(HeaderRows::padded(records)))
    }
}

/// Raw cell records of one worksheet, in document order
pub struct SheetRecords {
    xml: Reader<Cursor<Vec<u8>>>,
    buf: Vec<u8>,
    shared_strings: Vec<String>,
    date_styles: Vec<bool>,
    done: bool,
}

/// Accumulates one `<c>` element until its end tag
#[derive(Debug, Default)]
struct PendingCell {
    reference: Option<String>,
    column: usize,
    kind: Option<String>,
    style: Option<usize>,
    text: Option<String>,
    in_value: bool,
    in_inline: bool,
    in_inline_text: bool,
}

impl PendingCell {
    fn from_start<R>(
        e: &BytesStart<'_>,
        next_column: usize,
        xml: &Reader<R>,
    ) -> XlsxResult<Self> {
        let mut cell = PendingCell {
            column: next_column,
            ..Default::default()
        };
        for attr in e.attributes().flatten() {
            let value = attr.decode_and_unescape_value(xml)?;
            match attr.key.as_ref() {
                b"r" => {
                    if let Some(col) = column_index(&value) {
                        cell.column = col;
                    }
                    cell.reference = Some(value.into_owned());
                }
                b"t" => cell.kind = Some(value.into_owned()),
                b"s" => cell.style = value.parse::<usize>().ok(),
                _ => {}
            }
        }
        Ok(cell)
    }

    fn capturing(&self) -> bool {
        self.in_value || self.in_inline_text
    }

    fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    fn label(&self) -> String {
        self.reference
            .clone()
            .unwrap_or_else(|| format!("column {}", self.column + 1))
    }
}

impl SheetRecords {
    /// Open a workbook and position the reader at the first worksheet
    pub fn open<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        let start = Instant::now();
        let mut archive = zip::ZipArchive::new(reader)?;

        let shared_strings = package::read_shared_strings(&mut archive)?;
        let date_styles = package::read_date_styles(&mut archive)?;
        let sheet_path = package::first_sheet_path(&mut archive)?;

        // ZipFile borrows the archive, so the sheet part is inflated up front
        // and parsed incrementally from memory.
        let mut sheet = archive
            .by_name(&sheet_path)
            .map_err(|_| XlsxError::MissingPart(sheet_path.clone()))?;
        let mut bytes = Vec::with_capacity(preallocation(sheet.size()));
        sheet.read_to_end(&mut bytes)?;

        tracing::debug!(
            sheet = %sheet_path,
            shared_strings = shared_strings.len(),
            styles = date_styles.len(),
            bytes = bytes.len(),
            elapsed = ?start.elapsed(),
            "opened worksheet"
        );

        Ok(Self {
            xml: Reader::from_reader(Cursor::new(bytes)),
            buf: Vec::new(),
            shared_strings,
            date_styles,
            done: false,
        })
    }

    fn fail(&mut self, e: XlsxError) -> Option<XlsxResult<Vec<Value>>> {
        self.done = true;
        Some(Err(e))
    }
}

impl Iterator for SheetRecords {
    type Item = XlsxResult<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut cells: Option<Vec<Value>> = None;
        let mut cell: Option<PendingCell> = None;

        loop {
            let mut emit: Option<Vec<Value>> = None;
            let mut error: Option<XlsxError> = None;

            match self.xml.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => cells = Some(Vec::new()),
                    b"c" => {
                        let next_column = cells.as_ref().map_or(0, Vec::len);
                        match PendingCell::from_start(&e, next_column, &self.xml) {
                            Ok(c) => cell = Some(c),
                            Err(err) => error = Some(err),
                        }
                    }
                    b"v" => {
                        if let Some(c) = cell.as_mut() {
                            c.in_value = true;
                        }
                    }
                    b"is" => {
                        if let Some(c) = cell.as_mut() {
                            c.in_inline = true;
                        }
                    }
                    b"t" => {
                        if let Some(c) = cell.as_mut().filter(|c| c.in_inline) {
                            c.in_inline_text = true;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => emit = Some(Vec::new()),
                    b"c" => {
                        let row = cells.get_or_insert_with(Vec::new);
                        match PendingCell::from_start(&e, row.len(), &self.xml) {
                            Ok(c) => place(row, c.column, Value::Null),
                            Err(err) => error = Some(err),
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(t)) => {
                    if let Some(c) = cell.as_mut().filter(|c| c.capturing()) {
                        match t.unescape() {
                            Ok(text) => c.push_text(&text),
                            Err(err) => error = Some(err.into()),
                        }
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(c) = cell.take() {
                            match decode_cell(&c, &self.shared_strings, &self.date_styles) {
                                Ok(value) => {
                                    place(cells.get_or_insert_with(Vec::new), c.column, value)
                                }
                                Err(err) => error = Some(err),
                            }
                        }
                    }
                    b"v" => {
                        if let Some(c) = cell.as_mut() {
                            c.in_value = false;
                        }
                    }
                    b"t" => {
                        if let Some(c) = cell.as_mut() {
                            c.in_inline_text = false;
                        }
                    }
                    b"is" => {
                        if let Some(c) = cell.as_mut() {
                            c.in_inline = false;
                        }
                    }
                    b"row" => emit = Some(cells.take().unwrap_or_default()),
                    b"sheetData" => self.done = true,
                    _ => {}
                },
                Ok(Event::Eof) => self.done = true,
                Ok(_) => {}
                Err(err) => error = Some(err.into()),
            }
            self.buf.clear();

            if let Some(err) = error {
                return self.fail(err);
            }
            if let Some(row) = emit {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
        }
    }
}

/// Upper bound on the buffer reserved from the archive's declared size
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// Bytes to reserve for a part whose header claims `declared` bytes
fn preallocation(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or(0)
}

/// Store `value` at `column`, filling any gap with nulls
fn place(row: &mut Vec<Value>, column: usize, value: Value) {
    if column < row.len() {
        row[column] = value;
    } else {
        row.resize(column, Value::Null);
        row.push(value);
    }
}

/// Zero-based column index from an A1-style reference ("AB12" -> 27)
pub fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut index = 0usize;
    for b in letters {
        index = index * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize;
    }
    Some(index - 1)
}

fn decode_cell(
    cell: &PendingCell,
    shared_strings: &[String],
    date_styles: &[bool],
) -> XlsxResult<Value> {
    let invalid = |message: String| XlsxError::Cell {
        cell: cell.label(),
        message,
    };

    let Some(text) = cell.text.as_deref() else {
        return Ok(Value::Null);
    };

    match cell.kind.as_deref() {
        Some("s") => {
            let index = text
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid(format!("bad shared string index {text:?}")))?;
            shared_strings
                .get(index)
                .cloned()
                .map(Value::String)
                .ok_or_else(|| invalid(format!("shared string {index} out of range")))
        }
        Some("str") | Some("inlineStr") => Ok(Value::String(package::decode_excel_escapes(text))),
        Some("b") => match text.trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(invalid(format!("bad boolean {other:?}"))),
        },
        Some("e") => Ok(Value::String(text.to_string())),
        Some("d") => parse_iso_timestamp(text.trim())
            .map(Value::DateTime)
            .ok_or_else(|| invalid(format!("bad ISO date {text:?}"))),
        _ => {
            let text = text.trim();
            let is_date = cell
                .style
                .and_then(|s| date_styles.get(s))
                .copied()
                .unwrap_or(false);

            if is_date {
                let serial = text
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("bad date serial {text:?}")))?;
                return serial_to_datetime(serial)
                    .map(Value::DateTime)
                    .ok_or_else(|| invalid(format!("date serial {serial} out of range")));
            }

            if !text.contains(['.', 'e', 'E']) {
                if let Ok(n) = text.parse::<i64>() {
                    return Ok(Value::Int(n));
                }
            }
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| invalid(format!("bad number {text:?}")))
        }
    }
}

fn parse_iso_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
