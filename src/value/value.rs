use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use std::borrow::Cow;
use std::fmt::{Debug, Display, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.3f";

/// A log argument, classified by how it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw text, never quoted.
    Label(String),
    /// Rendered in UTC with the configured layout.
    Time(DateTime<Utc>),
    /// Display text wrapped in double quotes.
    Quoted(String),
    /// `key=value`, with the value rendered recursively.
    Pair(Box<KV>),
    /// Default textual form, unquoted.
    Plain(String),
}

impl Value {
    pub fn label(text: impl Into<String>) -> Self {
        Value::Label(text.into())
    }

    pub fn quoted(value: impl Display) -> Self {
        Value::Quoted(value.to_string())
    }

    pub fn plain(value: impl Display) -> Self {
        Value::Plain(value.to_string())
    }

    pub fn debug(value: impl Debug) -> Self {
        Value::Plain(format!("{value:?}"))
    }

    pub fn time(at: impl Into<DateTime<Utc>>) -> Self {
        Value::Time(at.into())
    }
}

/// Capability for values that know how they should appear in a log line.
///
/// Implement it on your own types to control their rendering; return
/// [`Value::Label`] for text that must not be quoted.
pub trait Loggable {
    fn to_log_value(&self) -> Value;
}

/// Text that is written as-is, without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Lbl(pub String);

impl Lbl {
    pub fn new(text: impl Into<String>) -> Self {
        Lbl(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Lbl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A key/value pair written as `key=value`.
#[derive(Debug, Clone, PartialEq)]
pub struct KV {
    pub key: String,
    pub value: Value,
}

impl KV {
    pub fn new(key: impl Into<String>, value: impl Loggable) -> Self {
        Self {
            key: key.into(),
            value: value.to_log_value(),
        }
    }
}

/// Rendering options shared by a logger family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub time_format: String,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Format {
    pub fn new(time_format: impl Into<String>) -> Self {
        Self {
            time_format: time_format.into(),
        }
    }

    pub fn render(&self, value: &Value) -> String {
        let mut out = String::new();
        self.render_into(&mut out, value);
        out
    }

    pub fn render_into(&self, out: &mut String, value: &Value) {
        match value {
            Value::Label(text) | Value::Plain(text) => out.push_str(text),
            Value::Time(at) => self.time_into(out, at),
            Value::Quoted(text) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
            Value::Pair(kv) => {
                out.push_str(&kv.key);
                out.push('=');
                self.render_into(out, &kv.value);
            }
        }
    }

    pub fn timestamp(&self) -> String {
        let mut out = String::new();
        self.time_into(&mut out, &Utc::now());
        out
    }

    fn time_into(&self, out: &mut String, at: &DateTime<Utc>) {
        let mark = out.len();
        // chrono reports an unknown specifier as fmt::Error instead of panicking here
        if write!(out, "{}", at.format(&self.time_format)).is_err() {
            out.truncate(mark);
            out.push_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
}

impl Loggable for Value {
    fn to_log_value(&self) -> Value {
        self.clone()
    }
}

impl Loggable for Lbl {
    fn to_log_value(&self) -> Value {
        Value::Label(self.0.clone())
    }
}

impl Loggable for KV {
    fn to_log_value(&self) -> Value {
        Value::Pair(Box::new(self.clone()))
    }
}

impl<T: Loggable + ?Sized> Loggable for &T {
    fn to_log_value(&self) -> Value {
        (**self).to_log_value()
    }
}

impl<T: Loggable> Loggable for Option<T> {
    fn to_log_value(&self) -> Value {
        match self {
            Some(value) => value.to_log_value(),
            None => Value::Plain("<nil>".to_string()),
        }
    }
}

impl Loggable for str {
    fn to_log_value(&self) -> Value {
        Value::Quoted(self.to_string())
    }
}

impl Loggable for String {
    fn to_log_value(&self) -> Value {
        Value::Quoted(self.clone())
    }
}

impl Loggable for Cow<'_, str> {
    fn to_log_value(&self) -> Value {
        Value::Quoted(self.to_string())
    }
}

impl Loggable for Path {
    fn to_log_value(&self) -> Value {
        Value::Quoted(self.display().to_string())
    }
}

impl Loggable for PathBuf {
    fn to_log_value(&self) -> Value {
        self.as_path().to_log_value()
    }
}

impl Loggable for dyn std::error::Error {
    fn to_log_value(&self) -> Value {
        Value::quoted(self)
    }
}

impl Loggable for dyn std::error::Error + Send + Sync {
    fn to_log_value(&self) -> Value {
        Value::quoted(self)
    }
}

impl Loggable for std::io::Error {
    fn to_log_value(&self) -> Value {
        Value::quoted(self)
    }
}

impl Loggable for anyhow::Error {
    fn to_log_value(&self) -> Value {
        Value::quoted(self)
    }
}

impl Loggable for DateTime<Utc> {
    fn to_log_value(&self) -> Value {
        Value::Time(*self)
    }
}

impl Loggable for DateTime<Local> {
    fn to_log_value(&self) -> Value {
        Value::Time(self.with_timezone(&Utc))
    }
}

impl Loggable for DateTime<FixedOffset> {
    fn to_log_value(&self) -> Value {
        Value::Time(self.with_timezone(&Utc))
    }
}

impl Loggable for SystemTime {
    fn to_log_value(&self) -> Value {
        Value::Time(DateTime::<Utc>::from(*self))
    }
}

macro_rules! plain_loggable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Loggable for $ty {
                fn to_log_value(&self) -> Value {
                    Value::Plain(self.to_string())
                }
            }
        )*
    };
}

plain_loggable!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
