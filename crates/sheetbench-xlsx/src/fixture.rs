//! Benchmark fixture writer

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use chrono::{Days, NaiveDate};
use sheetbench_core::date_to_serial;

use crate::error::XlsxResult;

/// Column names of the fixture, in order
pub const FIXTURE_HEADERS: [&str; 5] = ["number", "decimal", "date", "boolean", "text"];

/// Style index (into `cellXfs`) of the short-date format
const DATE_STYLE: u32 = 1;

/// Filler dates cycle through this many days after the control date
const DATE_CYCLE_DAYS: u64 = 36_500;

/// One typed row of the fixture
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRow {
    pub number: i64,
    pub decimal: f64,
    pub date: NaiveDate,
    pub boolean: bool,
    pub text: String,
}

impl FixtureRow {
    /// The first data row, checked by every reader
    pub fn control() -> Self {
        Self {
            number: 1,
            decimal: 1.1,
            date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            boolean: true,
            text: "CONTROL ROW".to_string(),
        }
    }

    /// Deterministic filler row; `index` counts from zero after the control row
    pub fn filler(index: usize) -> Self {
        let control = Self::control();
        let n = (index as i64).wrapping_add(2);
        let offset = Days::new(index as u64 % DATE_CYCLE_DAYS + 1);
        Self {
            number: n,
            // always carries a fraction so it stays a float on every reader
            decimal: n as f64 + 0.25,
            date: control
                .date
                .checked_add_days(offset)
                .unwrap_or(control.date),
            boolean: index % 2 == 1,
            text: format!("row {n}"),
        }
    }
}

/// Writes the benchmark fixture workbook.
///
/// The workbook has one sheet: the header row, the control row, then
/// `filler_rows` generated rows. Strings go through the shared string
/// table and dates carry built-in number format 14, as office suites write
/// them.
#[derive(Debug, Clone, Default)]
pub struct FixtureWriter {
    filler_rows: usize,
}

impl FixtureWriter {
    /// Create a writer producing `filler_rows` rows after the control row
    pub fn new(filler_rows: usize) -> Self {
        Self { filler_rows }
    }

    /// Number of data rows written, control row included
    pub fn data_rows(&self) -> usize {
        self.filler_rows + 1
    }

    /// Iterate the data rows this writer produces
    pub fn rows(&self) -> impl Iterator<Item = FixtureRow> {
        std::iter::once(FixtureRow::control()).chain((0..self.filler_rows).map(FixtureRow::filler))
    }

    /// Write the fixture to a file path
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let file = File::create(path.as_ref())?;
        self.write(BufWriter::new(file))?;
        tracing::debug!(
            path = %path.as_ref().display(),
            rows = self.data_rows(),
            "wrote fixture"
        );
        Ok(())
    }

    /// Write the fixture to a writer
    pub fn write<W: Write + Seek>(&self, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        Self::write_static_part(&mut zip, "[Content_Types].xml", CONTENT_TYPES)?;
        Self::write_static_part(&mut zip, "_rels/.rels", ROOT_RELS)?;
        Self::write_static_part(&mut zip, "xl/workbook.xml", WORKBOOK)?;
        Self::write_static_part(&mut zip, "xl/_rels/workbook.xml.rels", WORKBOOK_RELS)?;
        Self::write_static_part(&mut zip, "xl/styles.xml", STYLES)?;
        self.write_shared_strings(&mut zip)?;
        self.write_worksheet(&mut zip)?;

        let mut inner = zip.finish()?;
        inner.flush()?;
        Ok(())
    }

    fn write_static_part<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Shared strings: the five headers, then one text per data row.
    ///
    /// Row `i` (zero-based, control row first) therefore uses index `5 + i`.
    fn write_shared_strings<W: Write + Seek>(&self, zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/sharedStrings.xml", options)?;

        let count = FIXTURE_HEADERS.len() + self.data_rows();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{count}" uniqueCount="{count}">"#
        )?;
        for header in FIXTURE_HEADERS {
            write!(zip, "<si><t>{}</t></si>", escape_xml(header))?;
        }
        for row in self.rows() {
            write!(zip, "<si><t>{}</t></si>", escape_xml(&row.text))?;
        }
        zip.write_all(b"</sst>")?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(&self, zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/worksheets/sheet1.xml", options)?;

        let last_row = self.data_rows() + 1;
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<dimension ref="A1:E{last_row}"/>
<sheetData>"#
        )?;

        zip.write_all(b"<row r=\"1\">")?;
        for (col, _) in FIXTURE_HEADERS.iter().enumerate() {
            write!(
                zip,
                r#"<c r="{}1" t="s"><v>{col}</v></c>"#,
                column_letter(col)
            )?;
        }
        zip.write_all(b"</row>")?;

        for (i, row) in self.rows().enumerate() {
            let r = i + 2;
            let text_index = FIXTURE_HEADERS.len() + i;
            write!(
                zip,
                concat!(
                    r#"<row r="{r}">"#,
                    r#"<c r="A{r}"><v>{number}</v></c>"#,
                    r#"<c r="B{r}"><v>{decimal}</v></c>"#,
                    r#"<c r="C{r}" s="{style}"><v>{date}</v></c>"#,
                    r#"<c r="D{r}" t="b"><v>{boolean}</v></c>"#,
                    r#"<c r="E{r}" t="s"><v>{text}</v></c>"#,
                    "</row>"
                ),
                r = r,
                number = row.number,
                decimal = row.decimal,
                style = DATE_STYLE,
                date = date_to_serial(row.date),
                boolean = u8::from(row.boolean),
                text = text_index,
            )?;
        }

        zip.write_all(b"</sheetData>\n</worksheet>")?;
        Ok(())
    }
}

fn column_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="Sheet1" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="2">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#;
