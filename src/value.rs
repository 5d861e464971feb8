//! Value representation
//!
//! Primitive values plus object handles. Objects themselves live in the
//! realm's [`ObjectGraph`](crate::object::ObjectGraph); a value only carries
//! the arena index.

use std::fmt;
use std::rc::Rc;

use crate::object::ObjectId;

/// Trait for types that have cheap (O(1), reference-counted) clones.
///
/// Regular `.clone()` still works; `cheap_clone()` makes it explicit at the
/// call site that only a reference count is bumped.
pub trait CheapClone: Clone {
    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: ?Sized> CheapClone for Rc<T> {}

/// A value of the modeled language
#[derive(Clone, Default)]
pub enum Value {
    /// The undefined-marker: result of reading a missing property
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
    Symbol(Symbol),
    Object(ObjectId),
}

impl Value {
    /// The object handle, if this is an object
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Convert to string (ToString). Objects are not asked for a
    /// `toString` method.
    pub fn to_js_string(&self) -> JsString {
        match self {
            Value::Undefined => JsString::from("undefined"),
            Value::Null => JsString::from("null"),
            Value::Boolean(true) => JsString::from("true"),
            Value::Boolean(false) => JsString::from("false"),
            Value::Number(n) => JsString::from(number_to_js_string(*n)),
            Value::String(s) => s.clone(),
            Value::Symbol(s) => JsString::from(s.to_string()),
            Value::Object(_) => JsString::from("[object Object]"),
        }
    }

    /// Convert to boolean (ToBoolean)
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) => true,
            Value::Object(_) => true,
        }
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            // NaN !== NaN falls out of f64 comparison
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }

    /// SameValue: like strict equality, but NaN equals NaN and +0 differs from -0
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    return true;
                }
                a == b && a.is_sign_negative() == b.is_sign_negative()
            }
            _ => self.strict_equals(other),
        }
    }
}

/// Number::toString with radix 10
///
/// Shortest round-trip digits; plain notation while the decimal point sits
/// within 21 digits of the first one, exponent notation otherwise.
pub fn number_to_js_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return n.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return n.to_string();
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        match digits.split_at_checked(point as usize) {
            Some((int, frac)) => format!("{}.{}", int, frac),
            None => digits,
        }
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else {
        let exp_sign = if point > 0 { '+' } else { '-' };
        let exp = (point - 1).unsigned_abs();
        let mut chars = digits.chars();
        let first = chars.next().unwrap_or('0');
        let rest = chars.as_str();
        if rest.is_empty() {
            format!("{}e{}{}", first, exp_sign, exp)
        } else {
            format!("{}.{}e{}{}", first, rest, exp_sign, exp)
        }
    };
    format!("{}{}", sign, body)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s.as_str()),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Object(id) => write!(f, "[object {}]", id),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

// Conversions from Rust types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(JsString::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(JsString::from(s))
    }
}

impl From<JsString> for Value {
    fn from(s: JsString) -> Self {
        Value::String(s)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Object(id)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

/// Reference-counted string
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct JsString(Rc<str>);

impl CheapClone for JsString {}

impl JsString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for JsString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for JsString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JsString {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for JsString {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString(s.into())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString(s.into())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbol primitive
///
/// Symbols compare by id; the description is informational only.
#[derive(Clone, Debug)]
pub struct Symbol {
    id: u64,
    pub description: Option<JsString>,
}

impl Symbol {
    /// Create a symbol with the given id. Ids must be unique per realm, so
    /// symbols are normally obtained from [`Realm::create_symbol`](crate::Realm::create_symbol).
    pub fn new(id: u64, description: Option<JsString>) -> Self {
        Self { id, description }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "Symbol({})", desc),
            None => write!(f, "Symbol()"),
        }
    }
}
