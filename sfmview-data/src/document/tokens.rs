use std::fmt::Display;
use std::str::{self, FromStr, SplitWhitespace};

/// Decode one raw line. A trailing `\r` is left to the tokenizer.
pub(crate) fn decode_line(bytes: &[u8]) -> Result<&str, String> {
    str::from_utf8(bytes).map_err(|err| format!("line is not valid UTF-8: {err}"))
}

/// Whitespace-separated tokens of one text record.
pub(crate) struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self {
            inner: line.split_whitespace(),
        }
    }

    pub(crate) fn next_str(&mut self, what: &str) -> Result<&'a str, String> {
        self.inner.next().ok_or_else(|| format!("missing {what}"))
    }

    pub(crate) fn next_value<T>(&mut self, what: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: Display,
    {
        let token = self.next_str(what)?;
        token
            .parse()
            .map_err(|err| format!("invalid {what} '{token}': {err}"))
    }

    /// Like `next_value`, but rejects `nan` and `inf`.
    pub(crate) fn next_finite(&mut self, what: &str) -> Result<f32, String> {
        let value: f32 = self.next_value(what)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("non-finite {what} '{value}'"))
        }
    }

    pub(crate) fn finish(mut self) -> Result<(), String> {
        match self.inner.next() {
            Some(extra) => Err(format!("unexpected trailing token '{extra}'")),
            None => Ok(()),
        }
    }
}
