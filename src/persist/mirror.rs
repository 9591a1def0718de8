//! Text mirror
//!
//! A `;`-delimited export of the store, regenerated in full on every save.
//!
//! ## Format
//! ```text
//! id;nome_completo;endereco;ano_nascimento;documento;tipo_cliente;sexo;estado_civil;limite_credito;situacao_cadastral
//! 1;Ana Souza;Rua A, 10;1990;111;F;F;S;1500.00;A
//! 2;Bruno Lima;;1985;222;J;;;0.00;
//! ```
//! Credit limits carry exactly two decimals; an unset code is an empty field.

use std::io::Write as _;

use crate::error::{Result, StoreError};
use crate::record::{Address, Code, Document, Name, Record};

/// Header line naming the ten fields in order
pub const MIRROR_HEADER: &str = "id;nome_completo;endereco;ano_nascimento;documento;tipo_cliente;sexo;estado_civil;limite_credito;situacao_cadastral";

const FIELD_COUNT: usize = 10;
const DELIMITER: u8 = b';';
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render the whole mirror
///
/// Text and code fields are copied as raw bytes, whatever their encoding.
pub fn render(records: &[Record]) -> Vec<u8> {
    let mut out = Vec::with_capacity(MIRROR_HEADER.len() + 1 + records.len() * 64);
    out.extend_from_slice(MIRROR_HEADER.as_bytes());
    out.push(b'\n');
    for record in records {
        render_line(record, &mut out);
    }
    out
}

/// Append one data line (newline included)
pub fn render_line(record: &Record, out: &mut Vec<u8>) {
    // Writing into a Vec cannot fail.
    let _ = write!(out, "{};", record.id);
    push_text(out, record.full_name.as_bytes());
    push_text(out, record.address.as_bytes());
    let _ = write!(out, "{};", record.birth_year);
    push_text(out, record.document.as_bytes());
    push_code(out, record.customer_type);
    push_code(out, record.sex);
    push_code(out, record.marital_status);
    let _ = write!(out, "{:.2};", record.credit_limit);
    if !record.registration_status.is_empty() {
        out.push(record.registration_status.as_byte());
    }
    out.push(b'\n');
}

/// Delimiters and line breaks inside text would split the line; blank them
fn push_text(out: &mut Vec<u8>, text: &[u8]) {
    out.extend(text.iter().map(|&b| match b {
        DELIMITER | b'\n' | b'\r' => b' ',
        other => other,
    }));
    out.push(DELIMITER);
}

fn push_code(out: &mut Vec<u8>, code: Code) {
    if !code.is_empty() {
        out.push(code.as_byte());
    }
    out.push(DELIMITER);
}

/// Parse a whole mirror
///
/// Any unparsable numeric field fails the whole parse: a partial import
/// could silently drop records.
pub fn parse(data: &[u8]) -> Result<Vec<Record>> {
    let data = data.strip_prefix(BOM).unwrap_or(data);
    let mut lines = data
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace));

    let Some((line_no, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let end = header
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    let header = &header[..end];
    if header != MIRROR_HEADER.as_bytes() {
        return Err(StoreError::Corruption(format!(
            "mirror header on line {} does not match: {:?}",
            line_no,
            String::from_utf8_lossy(header)
        )));
    }

    lines.map(|(line_no, line)| parse_line(line_no, line)).collect()
}

/// Parse one data line
pub fn parse_line(line_no: usize, line: &[u8]) -> Result<Record> {
    let mut fields: Vec<&[u8]> = line.split(|&b| b == DELIMITER).collect();
    if fields.len() > FIELD_COUNT {
        return Err(StoreError::MirrorParse {
            line: line_no,
            field: "line",
            message: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        });
    }
    // Trailing fields may be left out entirely.
    fields.resize(FIELD_COUNT, b"");

    Ok(Record {
        id: parse_number(line_no, "id", fields[0])?,
        full_name: Name::from_bytes(fields[1]),
        address: Address::from_bytes(fields[2]),
        birth_year: parse_number(line_no, "ano_nascimento", fields[3])?,
        document: Document::from_bytes(fields[4]),
        customer_type: Code::parse(fields[5]),
        sex: Code::parse(fields[6]),
        marital_status: Code::parse(fields[7]),
        credit_limit: parse_number(line_no, "limite_credito", fields[8])?,
        registration_status: Code::parse(fields[9]),
    })
}

fn parse_number<T>(line: usize, field: &'static str, raw: &[u8]) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let text = String::from_utf8_lossy(raw);
    text.trim().parse().map_err(|e: T::Err| StoreError::MirrorParse {
        line,
        field,
        message: format!("{:?}: {}", text, e),
    })
}
