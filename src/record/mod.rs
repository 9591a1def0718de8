//! Record Module
//!
//! The customer entity and its field types.
//!
//! ## Responsibilities
//! - Hold one customer with bounded text fields
//! - Normalize single-character codes to upper case
//! - Fixed-layout binary encoding (see [`codec`])

pub mod codec;
mod text;

use std::fmt;

pub use codec::{decode_all, decode_record, encode_all, encode_record, RECORD_SIZE};
pub use text::{cmp_ignore_ascii_case, Address, BoundedText, Document, Name};

/// Single-byte code field (customer type, sex, marital status, registration)
///
/// Stored upper case. The NUL code means "not informed".
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Code(u8);

impl Code {
    /// The "not informed" code
    pub const EMPTY: Code = Code(0);

    /// Code from a raw byte, upper-cased
    pub fn from_byte(byte: u8) -> Self {
        Code(byte.to_ascii_uppercase())
    }

    /// Code from user input or a mirror field: first byte, upper-cased
    pub fn parse(input: impl AsRef<[u8]>) -> Self {
        input
            .as_ref()
            .first()
            .copied()
            .map(Self::from_byte)
            .unwrap_or(Self::EMPTY)
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<char> for Code {
    fn from(c: char) -> Self {
        let mut buf = [0u8; 4];
        Code::parse(c.encode_utf8(&mut buf).as_bytes())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            Ok(())
        } else {
            write!(f, "{}", self.0 as char)
        }
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({:?})", self.0 as char)
    }
}

/// Customer fields supplied by a caller (everything except the id)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientData {
    pub full_name: Name,
    pub address: Address,
    pub birth_year: i16,
    pub document: Document,
    pub customer_type: Code,
    pub sex: Code,
    pub marital_status: Code,
    pub credit_limit: f32,
    pub registration_status: Code,
}

impl ClientData {
    /// Minimal client with a name and a document, other fields defaulted
    pub fn new(full_name: &str, document: &str) -> Self {
        Self {
            full_name: Name::new(full_name),
            document: Document::new(document),
            ..Self::default()
        }
    }

    /// Attach an id, producing a stored record
    pub fn into_record(self, id: i32) -> Record {
        Record {
            id,
            full_name: self.full_name,
            address: self.address,
            birth_year: self.birth_year,
            document: self.document,
            customer_type: self.customer_type,
            sex: self.sex,
            marital_status: self.marital_status,
            credit_limit: self.credit_limit,
            registration_status: self.registration_status,
        }
    }
}

/// One stored customer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Unique, assigned by the store
    pub id: i32,
    pub full_name: Name,
    pub address: Address,
    pub birth_year: i16,
    /// Unique among live records
    pub document: Document,
    pub customer_type: Code,
    pub sex: Code,
    pub marital_status: Code,
    pub credit_limit: f32,
    pub registration_status: Code,
}

impl Record {
    /// Everything but the id
    pub fn data(&self) -> ClientData {
        ClientData {
            full_name: self.full_name.clone(),
            address: self.address.clone(),
            birth_year: self.birth_year,
            document: self.document.clone(),
            customer_type: self.customer_type,
            sex: self.sex,
            marital_status: self.marital_status,
            credit_limit: self.credit_limit,
            registration_status: self.registration_status,
        }
    }

    /// Overwrite every field but the id
    pub fn apply(&mut self, data: ClientData) {
        let id = self.id;
        *self = data.into_record(id);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Nome: {} | Documento: {} | Tipo: {} | Sexo: {} | Estado civil: {} \
             | Limite: {:.2} | Situação: {} | Nascimento: {} | Endereço: {}",
            self.id,
            self.full_name,
            self.document,
            self.customer_type,
            self.sex,
            self.marital_status,
            self.credit_limit,
            self.registration_status,
            self.birth_year,
            self.address,
        )
    }
}
