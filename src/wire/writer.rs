use rmp::encode;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Map,
    Array,
}

impl Container {
    fn name(self) -> &'static str {
        match self {
            Container::Map => "map",
            Container::Array => "array",
        }
    }
}

#[derive(Debug)]
struct Open {
    kind: Container,
    /// Values still owed. A map of `n` entries owes `2n` (keys and values).
    declared: u64,
    written: u64,
}

/// Append-only envelope writer with a sticky error.
///
/// Writes never return errors individually; the first failure is kept and
/// every later write becomes a no-op. [`WireWriter::finish`] is the only way
/// to get the bytes out and reports that failure, including any container
/// whose written entry count differs from the count it declared.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
    open: Vec<Open>,
    error: Option<Error>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_map(&mut self, entries: u32) {
        if !self.value_slot() {
            return;
        }
        if let Err(e) = encode::write_map_len(&mut self.buf, entries) {
            self.fail(e.to_string());
            return;
        }
        self.open.push(Open {
            kind: Container::Map,
            declared: u64::from(entries) * 2,
            written: 0,
        });
    }

    pub fn begin_array(&mut self, len: u32) {
        if !self.value_slot() {
            return;
        }
        if let Err(e) = encode::write_array_len(&mut self.buf, len) {
            self.fail(e.to_string());
            return;
        }
        self.open.push(Open {
            kind: Container::Array,
            declared: u64::from(len),
            written: 0,
        });
    }

    pub fn end_map(&mut self) {
        self.close(Container::Map);
    }

    pub fn end_array(&mut self) {
        self.close(Container::Array);
    }

    pub fn write_str(&mut self, value: &str) {
        if !self.value_slot() {
            return;
        }
        if let Err(e) = encode::write_str(&mut self.buf, value) {
            self.fail(e.to_string());
        }
    }

    pub fn write_uint(&mut self, value: u64) {
        if !self.value_slot() {
            return;
        }
        if let Err(e) = encode::write_uint(&mut self.buf, value) {
            self.fail(e.to_string());
        }
    }

    pub fn write_bool(&mut self, value: bool) {
        if !self.value_slot() {
            return;
        }
        if let Err(e) = encode::write_bool(&mut self.buf, value) {
            self.fail(e.to_string());
        }
    }

    /// Tear the writer down, yielding the encoded bytes or the first error.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if let Some(open) = self.open.last() {
            return Err(Error::SerializeFailed(format!(
                "{} left open with {} of {} values written",
                open.kind.name(),
                open.written,
                open.declared
            )));
        }
        Ok(self.buf)
    }

    /// Claim one value slot in the innermost open container.
    fn value_slot(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        if let Some(top) = self.open.last_mut() {
            if top.written == top.declared {
                let kind = top.kind.name();
                let declared = top.declared;
                self.fail(format!("{kind} overflow: more than {declared} values written"));
                return false;
            }
            top.written += 1;
        }
        true
    }

    fn close(&mut self, kind: Container) {
        if self.error.is_some() {
            return;
        }
        match self.open.pop() {
            Some(open) if open.kind != kind => self.fail(format!(
                "closed {} while {} was open",
                kind.name(),
                open.kind.name()
            )),
            Some(open) if open.written != open.declared => self.fail(format!(
                "{} declared {} values but {} were written",
                kind.name(),
                open.declared,
                open.written
            )),
            Some(_) => {}
            None => self.fail(format!("closed {} with nothing open", kind.name())),
        }
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(Error::SerializeFailed(message));
        }
    }
}
