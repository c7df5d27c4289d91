use std::io;

use rmp::decode::{self, NumValueReadError, ValueReadError};
use rmp::Marker;

use crate::error::{Error, ParseError, Result};

/// Coarse type of the next value, as announced by its marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Bin,
    Array,
    Map,
    Ext,
}

impl ValueKind {
    fn of(marker: Marker) -> Option<Self> {
        let kind = match marker {
            Marker::Null => ValueKind::Nil,
            Marker::True | Marker::False => ValueKind::Bool,
            Marker::FixPos(_)
            | Marker::FixNeg(_)
            | Marker::U8
            | Marker::U16
            | Marker::U32
            | Marker::U64
            | Marker::I8
            | Marker::I16
            | Marker::I32
            | Marker::I64 => ValueKind::Int,
            Marker::F32 | Marker::F64 => ValueKind::Float,
            Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => ValueKind::Str,
            Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => ValueKind::Bin,
            Marker::FixArray(_) | Marker::Array16 | Marker::Array32 => ValueKind::Array,
            Marker::FixMap(_) | Marker::Map16 | Marker::Map32 => ValueKind::Map,
            Marker::FixExt1
            | Marker::FixExt2
            | Marker::FixExt4
            | Marker::FixExt8
            | Marker::FixExt16
            | Marker::Ext8
            | Marker::Ext16
            | Marker::Ext32 => ValueKind::Ext,
            _ => return None,
        };
        Some(kind)
    }
}

/// Cursor over an untrusted envelope.
///
/// Every read either consumes exactly one well-formed value or fails; no
/// length taken from the input is trusted before it has been compared with
/// the bytes that actually remain.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    rd: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rd: data }
    }

    pub fn remaining(&self) -> usize {
        self.rd.len()
    }

    pub fn peek_kind(&self) -> Result<ValueKind> {
        let byte = *self.rd.first().ok_or(ParseError::UnexpectedEnd)?;
        ValueKind::of(Marker::from_u8(byte)).ok_or_else(|| ParseError::ReservedMarker.into())
    }

    pub fn read_map_len(&mut self) -> Result<u32> {
        let found = self.next_byte();
        decode::read_map_len(&mut self.rd).map_err(|e| value_error(e, "map", found))
    }

    pub fn read_array_len(&mut self) -> Result<u32> {
        let found = self.next_byte();
        decode::read_array_len(&mut self.rd).map_err(|e| value_error(e, "array", found))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let found = self.next_byte();
        decode::read_bool(&mut self.rd).map_err(|e| value_error(e, "bool", found))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let found = self.next_byte();
        decode::read_int::<u32, _>(&mut self.rd).map_err(|e| num_error(e, found))
    }

    /// Read a string of at most `limit` bytes into a freshly sized buffer.
    ///
    /// A declared length above `limit` or above the remaining input is a
    /// parse failure; nothing is allocated or copied in that case.
    pub fn read_str(&mut self, limit: u32) -> Result<String> {
        let found = self.next_byte();
        let len = decode::read_str_len(&mut self.rd).map_err(|e| value_error(e, "string", found))?;
        if len > limit {
            return Err(ParseError::StringTooLong { len, limit }.into());
        }

        let len = len as usize;
        let body = self.take(len)?;

        let mut staging = Vec::new();
        staging
            .try_reserve_exact(len)
            .map_err(|_| Error::MemoryAllocationFailed { requested: len })?;
        staging.extend_from_slice(body);

        String::from_utf8(staging).map_err(|_| ParseError::InvalidUtf8.into())
    }

    /// Consume one complete value of any type, including nested containers.
    ///
    /// Works with a counter of values still owed rather than recursion, so
    /// deeply nested input costs no stack. Each value consumes at least one
    /// byte, which bounds the loop by the input length.
    pub fn skip_value(&mut self) -> Result<()> {
        let mut pending: u64 = 1;
        while pending > 0 {
            pending -= 1;
            let marker = Marker::from_u8(self.take(1)?[0]);
            match marker {
                Marker::Null
                | Marker::True
                | Marker::False
                | Marker::FixPos(_)
                | Marker::FixNeg(_) => {}
                Marker::U8 | Marker::I8 => self.advance(1)?,
                Marker::U16 | Marker::I16 => self.advance(2)?,
                Marker::U32 | Marker::I32 | Marker::F32 => self.advance(4)?,
                Marker::U64 | Marker::I64 | Marker::F64 => self.advance(8)?,
                Marker::FixStr(n) => self.advance(usize::from(n))?,
                Marker::Str8 | Marker::Bin8 => {
                    let n = self.be_len(1)?;
                    self.advance(n)?
                }
                Marker::Str16 | Marker::Bin16 => {
                    let n = self.be_len(2)?;
                    self.advance(n)?
                }
                Marker::Str32 | Marker::Bin32 => {
                    let n = self.be_len(4)?;
                    self.advance(n)?
                }
                Marker::FixArray(n) => pending += u64::from(n),
                Marker::Array16 => pending += self.be_len(2)? as u64,
                Marker::Array32 => pending += self.be_len(4)? as u64,
                Marker::FixMap(n) => pending += u64::from(n) * 2,
                Marker::Map16 => pending += self.be_len(2)? as u64 * 2,
                Marker::Map32 => pending += self.be_len(4)? as u64 * 2,
                Marker::FixExt1 => self.advance(1 + 1)?,
                Marker::FixExt2 => self.advance(1 + 2)?,
                Marker::FixExt4 => self.advance(1 + 4)?,
                Marker::FixExt8 => self.advance(1 + 8)?,
                Marker::FixExt16 => self.advance(1 + 16)?,
                Marker::Ext8 => {
                    let n = self.be_len(1)?;
                    self.advance(1 + n)?
                }
                Marker::Ext16 => {
                    let n = self.be_len(2)?;
                    self.advance(1 + n)?
                }
                Marker::Ext32 => {
                    let n = self.be_len(4)?;
                    self.advance(1 + n)?
                }
                _ => return Err(ParseError::ReservedMarker.into()),
            }
        }
        Ok(())
    }

    fn next_byte(&self) -> u8 {
        self.rd.first().copied().unwrap_or(0)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.rd.len() {
            return Err(ParseError::Truncated {
                needed: n,
                remaining: self.rd.len(),
            }
            .into());
        }
        let (head, tail) = self.rd.split_at(n);
        self.rd = tail;
        Ok(head)
    }

    fn advance(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Big-endian length prefix of `width` bytes.
    fn be_len(&mut self, width: usize) -> Result<usize> {
        let bytes = self.take(width)?;
        Ok(bytes.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b)))
    }
}

fn value_error(err: ValueReadError<io::Error>, expected: &'static str, found: u8) -> Error {
    match err {
        ValueReadError::TypeMismatch(_) => ParseError::TypeMismatch { expected, found }.into(),
        _ => ParseError::UnexpectedEnd.into(),
    }
}

fn num_error(err: NumValueReadError<io::Error>, found: u8) -> Error {
    match err {
        NumValueReadError::TypeMismatch(_) => ParseError::TypeMismatch {
            expected: "unsigned integer",
            found,
        }
        .into(),
        NumValueReadError::OutOfRange => ParseError::OutOfRange("u32").into(),
        _ => ParseError::UnexpectedEnd.into(),
    }
}
