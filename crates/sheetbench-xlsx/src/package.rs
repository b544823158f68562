//! Workbook-level parts: sheet lookup, shared strings and date styles

use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// - `_x000d_` = CR
/// - `_x000a_` = LF
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(ch) => {
                result.push(ch);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Check whether a number format renders dates or times.
///
/// Built-in ids follow the ECMA-376 table. Custom codes are checked for date
/// placeholders after removing quoted literals, escapes and `[...]` sections
/// (colours, locales, elapsed-time markers).
pub fn is_date_format(num_fmt_id: u32, custom_code: Option<&str>) -> bool {
    if let Some(code) = custom_code {
        let mut plain = String::with_capacity(code.len());
        let mut chars = code.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    for q in chars.by_ref() {
                        if q == '"' {
                            break;
                        }
                    }
                }
                '[' => {
                    for q in chars.by_ref() {
                        if q == ']' {
                            break;
                        }
                    }
                }
                '\\' | '_' | '*' => {
                    chars.next();
                }
                other => plain.push(other.to_ascii_lowercase()),
            }
        }
        // "General" would otherwise match nothing, but be explicit
        if plain == "general" {
            return false;
        }
        return plain
            .chars()
            .any(|c| matches!(c, 'y' | 'm' | 'd' | 'h' | 's'));
    }

    matches!(num_fmt_id, 14..=22 | 45..=47)
}

/// Resolve the archive path of the first worksheet
pub(crate) fn first_sheet_path<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<String> {
    let r_id = first_sheet_rel_id(archive)?;
    let targets = read_workbook_rels(archive)?;
    targets
        .get(&r_id)
        .cloned()
        .ok_or_else(|| XlsxError::MissingPart(format!("worksheet relationship {r_id}")))
}

/// Read workbook.xml and return the relationship id of the first `<sheet>`
fn first_sheet_rel_id<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<String> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"sheet" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r:id" {
                        return Ok(attr.decode_and_unescape_value(&xml_reader)?.into_owned());
                    }
                }
            }
            Event::Eof => return Err(XlsxError::NoSheets),
            _ => {}
        }
        buf.clear();
    }
}

/// Read workbook.xml.rels and map worksheet relationship ids to archive paths
fn read_workbook_rels<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<HashMap<String, String>> {
    let file = archive
        .by_name("xl/_rels/workbook.xml.rels")
        .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut rel_type = None;

                for attr in e.attributes().flatten() {
                    let value = attr.decode_and_unescape_value(&xml_reader)?.into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value),
                        b"Target" => target = Some(value),
                        b"Type" => rel_type = Some(value),
                        _ => {}
                    }
                }

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.ends_with("/worksheet") {
                        // Relative targets hang off xl/
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{target}"),
                        };
                        rels.insert(id, full_path);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Read the shared strings table; a workbook without one is valid
pub(crate) fn read_shared_strings<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<Vec<String>> {
    let mut strings = Vec::new();

    let file = match archive.by_name("xl/sharedStrings.xml") {
        Ok(f) => f,
        Err(_) => return Ok(strings),
    };

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    // Phonetic hints carry their own <t> elements that are not cell text
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"si" => strings.push(String::new()),
            Event::End(e) => match e.name().as_ref() {
                b"si" => {
                    strings.push(decode_excel_escapes(&current));
                    current.clear();
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Text(e) if in_t => current.push_str(&e.unescape()?),
            Event::CData(e) if in_t => current.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Read styles.xml and flag which `cellXfs` entries carry a date format.
///
/// The returned vector is indexed by the cell's `s` attribute.
pub(crate) fn read_date_styles<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<Vec<bool>> {
    let file = match archive.by_name("xl/styles.xml") {
        Ok(f) => f,
        Err(_) => return Ok(Vec::new()),
    };

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut custom_formats: HashMap<u32, String> = HashMap::new();
    let mut xf_format_ids: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"numFmt" => {
                    let mut id = None;
                    let mut code = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"numFmtId" => {
                                id = attr
                                    .decode_and_unescape_value(&xml_reader)?
                                    .parse::<u32>()
                                    .ok();
                            }
                            b"formatCode" => {
                                code = Some(
                                    attr.decode_and_unescape_value(&xml_reader)?
                                        .into_owned(),
                                );
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(code)) = (id, code) {
                        custom_formats.insert(id, code);
                    }
                }
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => {
                    let mut id = 0;
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"numFmtId" {
                            id = attr
                                .decode_and_unescape_value(&xml_reader)?
                                .parse::<u32>()
                                .unwrap_or(0);
                        }
                    }
                    xf_format_ids.push(id);
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(xf_format_ids
        .into_iter()
        .map(|id| is_date_format(id, custom_formats.get(&id).map(String::as_str)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    fn archive_with(parts: &[(&str, &str)]) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, xml) in parts {
            zip.start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }
        zip::ZipArchive::new(zip.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_escaped_format_codes_are_decoded() {
        let styles = r#"<styleSheet>
  <numFmts count="2">
    <numFmt numFmtId="164" formatCode="yyyy&quot;-&quot;mm"/>
    <numFmt numFmtId="165" formatCode="0.00&quot; days&quot;"/>
  </numFmts>
  <cellXfs count="4">
    <xf numFmtId="0"/><xf numFmtId="164"/><xf numFmtId="165"/><xf numFmtId="14"/>
  </cellXfs>
</styleSheet>"#;
        let mut archive = archive_with(&[("xl/styles.xml", styles)]);
        assert_eq!(
            read_date_styles(&mut archive).unwrap(),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn test_first_sheet_follows_relationships() {
        let workbook = r#"<workbook xmlns:r="r"><sheets>
  <sheet name="Data &amp; more" sheetId="1" r:id="rId7"/>
</sheets></workbook>"#;
        let rels = r#"<Relationships>
  <Relationship Id="rId2" Type="http://x/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId7" Type="http://x/relationships/worksheet" Target="worksheets/data&amp;1.xml"/>
</Relationships>"#;
        let mut archive = archive_with(&[
            ("xl/workbook.xml", workbook),
            ("xl/_rels/workbook.xml.rels", rels),
        ]);
        assert_eq!(
            first_sheet_path(&mut archive).unwrap(),
            "xl/worksheets/data&1.xml"
        );
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("plain"), "plain");
        assert_eq!(decode_excel_escapes("a_x000d__x000a_b"), "a\r\nb");
        assert_eq!(decode_excel_escapes("tab_x0009_"), "tab\t");
        assert_eq!(decode_excel_escapes("_x005f_x"), "_x");
        assert_eq!(decode_excel_escapes("not_xZZ_escape"), "not_xZZ_escape");
        assert_eq!(decode_excel_escapes("short_x00"), "short_x00");
    }

    #[test]
    fn test_builtin_date_formats() {
        assert!(is_date_format(14, None));
        assert!(is_date_format(22, None));
        assert!(is_date_format(46, None));
        assert!(!is_date_format(0, None));
        assert!(!is_date_format(2, None));
        assert!(!is_date_format(49, None));
    }

    #[test]
    fn test_custom_date_formats() {
        assert!(is_date_format(164, Some("yyyy-mm-dd")));
        assert!(is_date_format(165, Some("[$-409]d-mmm-yy;@")));
        assert!(is_date_format(166, Some("hh:mm:ss")));
        assert!(!is_date_format(167, Some("#,##0.00")));
        assert!(!is_date_format(168, Some("0.00\" days\"")));
        assert!(!is_date_format(169, Some("[Red]#,##0")));
        assert!(!is_date_format(170, Some("General")));
    }
}
