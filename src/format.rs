//! Turning format arguments into log lines.
//!
//! [`render`] is the normal path: a heap line with a byte budget, failing
//! instead of aborting when memory cannot be reserved. [`LineBuf`] is the
//! allocation-free path used when that fails and by the fatal path.
//! [`printf`] formats C-style format strings over typed [`Arg`]s for callers
//! that still carry printf formats around.

use core::fmt::{self, Arguments};
use core::iter::Peekable;
use core::str::Chars;

use crate::Error;

struct Bounded {
    out: String,
    limit: usize,
    err: Option<Error>,
}

impl Bounded {
    const fn new(limit: usize) -> Self {
        Self {
            out: String::new(),
            limit,
            err: None,
        }
    }

    fn push(&mut self, s: &str) -> Result<(), Error> {
        if self.out.len() + s.len() > self.limit {
            return Err(Error::Capacity { limit: self.limit });
        }
        self.out.try_reserve(s.len()).map_err(|_| Error::Alloc)?;
        self.out.push_str(s);
        Ok(())
    }

    fn fill(&mut self, c: char, n: usize) -> Result<(), Error> {
        let mut tmp = [0u8; 4];
        let c = c.encode_utf8(&mut tmp);
        for _ in 0..n {
            self.push(c)?;
        }
        Ok(())
    }
}

impl fmt::Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }
}

/// Render `args` into a new string of at most `limit` bytes.
///
/// # Errors
/// [`Error::Capacity`] when the text is longer than `limit`, [`Error::Alloc`]
/// when the buffer cannot grow, [`Error::Fmt`] when a `Display` impl fails.
pub fn render(args: Arguments, limit: usize) -> Result<String, Error> {
    let mut w = Bounded::new(limit);
    match fmt::write(&mut w, args) {
        Ok(()) => Ok(w.out),
        Err(_) => Err(w.err.unwrap_or(Error::Fmt)),
    }
}

/// Fixed-capacity line on the stack.
///
/// Writes never fail: once the buffer is full the rest of the text is dropped,
/// cutting on a char boundary so the content stays valid UTF-8.
pub struct LineBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
    full: bool,
}

impl<const N: usize> LineBuf<N> {
    /// Empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            full: false,
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` when nothing was written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` once some text had to be dropped.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.full
    }

    /// The text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl<const N: usize> Default for LineBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for LineBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }
        let room = N - self.len;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        if take < s.len() {
            self.full = true;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Display for LineBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for LineBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

// ===== printf compatibility =====

/// A printf argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arg<'a> {
    /// `%s`
    Str(&'a str),
    /// `%d`, `%i`
    Int(i64),
    /// `%u`, `%x`, `%X`, `%o`
    Uint(u64),
    /// `%c`
    Char(char),
    /// `%p`
    Ptr(usize),
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(s)
    }
}
impl<'a> From<&'a String> for Arg<'a> {
    fn from(s: &'a String) -> Self {
        Self::Str(s.as_str())
    }
}
impl From<char> for Arg<'_> {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}
macro_rules! arg_from_signed { ($($t:ty),*) => { $(impl From<$t> for Arg<'_> { fn from(v: $t) -> Self { Self::Int(i64::from(v)) } })* } }
macro_rules! arg_from_unsigned { ($($t:ty),*) => { $(impl From<$t> for Arg<'_> { fn from(v: $t) -> Self { Self::Uint(u64::from(v)) } })* } }
arg_from_signed!(i8, i16, i32, i64);
arg_from_unsigned!(u8, u16, u32, u64);
impl From<usize> for Arg<'_> {
    fn from(v: usize) -> Self {
        Self::Uint(v as u64)
    }
}
impl From<isize> for Arg<'_> {
    fn from(v: isize) -> Self {
        Self::Int(v as i64)
    }
}

#[derive(Default)]
struct Spec {
    left: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

fn pad(out: &mut Bounded, body: &str, spec: &Spec, numeric: bool) -> Result<(), Error> {
    let n = body.chars().count();
    if n >= spec.width {
        return out.push(body);
    }
    let fill = spec.width - n;
    if spec.left {
        out.push(body)?;
        out.fill(' ', fill)
    } else if spec.zero && numeric {
        let (sign, digits) = match body.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", body),
        };
        out.push(sign)?;
        out.fill('0', fill)?;
        out.push(digits)
    } else {
        out.fill(' ', fill)?;
        out.push(body)
    }
}

fn min_digits(body: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) => {
            let (sign, digits) = match body.strip_prefix('-') {
                Some(rest) => ("-", rest),
                None => ("", body.as_str()),
            };
            if digits.len() >= p {
                return body;
            }
            format!("{sign}{}{digits}", "0".repeat(p - digits.len()))
        }
        None => body,
    }
}

/// Decimal field of a conversion; anything wider than `limit` cannot fit the
/// line.
fn field(chars: &mut Peekable<Chars<'_>>, limit: usize) -> Result<usize, Error> {
    let mut n = 0usize;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add(d as usize))
            .filter(|n| *n <= limit)
            .ok_or(Error::Capacity { limit })?;
        chars.next();
    }
    Ok(n)
}

/// Format a C-style format string into at most `limit` bytes.
///
/// Supports `%s %d %i %u %x %X %o %c %p %%`, the `-` and `0` flags, a width,
/// a precision, and the `h hh l ll z j t q` length modifiers (ignored).
///
/// # Errors
/// Returns an error on an unsupported conversion, a missing argument, an
/// argument whose kind does not match its conversion, or a format that ends
/// inside a conversion. [`Error::Capacity`] when a width or precision, or the
/// output, is larger than `limit`; [`Error::Alloc`] when the output cannot
/// grow.
pub fn printf(fmt: &str, args: &[Arg], limit: usize) -> Result<String, Error> {
    let mut out = Bounded::new(limit);
    let mut next = 0usize;
    let mut chars = fmt.chars().peekable();
    let mut tmp = [0u8; 4];

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c.encode_utf8(&mut tmp))?;
            continue;
        }
        let mut spec = Spec::default();
        loop {
            match chars.peek() {
                Some('-') => spec.left = true,
                Some('0') => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = field(&mut chars, limit)?;
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(field(&mut chars, limit)?);
        }
        while matches!(chars.peek(), Some('h' | 'l' | 'z' | 'j' | 't' | 'q')) {
            chars.next();
        }
        let conv = chars.next().ok_or(Error::Truncated)?;
        if conv == '%' {
            out.push("%")?;
            continue;
        }
        let index = next;
        let arg = *args.get(index).ok_or(Error::MissingArgument(index))?;
        next += 1;
        let mismatch = Error::ArgumentType {
            index,
            directive: conv,
        };
        match conv {
            's' => {
                let Arg::Str(s) = arg else { return Err(mismatch) };
                let s = match spec.precision {
                    Some(p) => s.char_indices().nth(p).map_or(s, |(i, _)| &s[..i]),
                    None => s,
                };
                pad(&mut out, s, &spec, false)?;
            }
            'd' | 'i' => {
                let body = match arg {
                    Arg::Int(v) => v.to_string(),
                    Arg::Uint(v) => v.to_string(),
                    _ => return Err(mismatch),
                };
                pad(&mut out, &min_digits(body, spec.precision), &spec, true)?;
            }
            'u' | 'x' | 'X' | 'o' => {
                let v = match arg {
                    Arg::Uint(v) => v,
                    #[allow(clippy::cast_sign_loss)]
                    Arg::Int(v) => v as u64,
                    _ => return Err(mismatch),
                };
                let body = match conv {
                    'u' => v.to_string(),
                    'x' => format!("{v:x}"),
                    'X' => format!("{v:X}"),
                    _ => format!("{v:o}"),
                };
                pad(&mut out, &min_digits(body, spec.precision), &spec, true)?;
            }
            'c' => {
                let ch = match arg {
                    Arg::Char(ch) => ch,
                    Arg::Int(v) => u8::try_from(v).map_err(|_| mismatch.clone())? as char,
                    Arg::Uint(v) => u8::try_from(v).map_err(|_| mismatch.clone())? as char,
                    _ => return Err(mismatch),
                };
                let mut tmp = [0u8; 4];
                pad(&mut out, ch.encode_utf8(&mut tmp), &spec, false)?;
            }
            'p' => {
                let v = match arg {
                    Arg::Ptr(v) => v as u64,
                    Arg::Uint(v) => v,
                    _ => return Err(mismatch),
                };
                pad(&mut out, &format!("{v:#x}"), &spec, false)?;
            }
            other => return Err(Error::Directive(other)),
        }
    }
    Ok(out.out)
}
