//! Read-only views of field values.
//!
//! The engine never sees concrete field types. Each field is read through
//! [`Reflect`] into a [`Value`], which says just enough about the value to
//! pick the applicable checks and to decide whether to cascade into it.

use crate::metadata::Inspect;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A borrowed view of one field value.
#[derive(Clone)]
pub enum Value<'a> {
    /// Absent value (`None`)
    Null,
    Bool(bool),
    Char(char),
    /// Signed integer, widened to 64 bits
    Int(i64),
    /// Unsigned integer, widened to 64 bits
    UInt(u64),
    Float(f64),
    /// Character data
    Text(&'a str),
    /// Enum variant name
    Enum(&'static str),
    /// A nested validatable object
    Object(&'a dyn Inspect),
    /// Ordered sequence: `Vec`, slices, fixed-size arrays
    Array(Elements<'a>),
    /// Any other collection, in its natural iteration order
    Collection(Elements<'a>),
}

/// Containers whose elements can be viewed one at a time.
pub trait Sequence {
    /// Number of elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Views of the elements, in the container's iteration order.
    fn elements(&self) -> Box<dyn Iterator<Item = Value<'_>> + '_>;
}

/// Elements of an array or collection value.
///
/// Element views are produced only when iterated, so reading a collection
/// field that is never cascaded into costs nothing per element. Bare
/// slices (`Box<[T]>`, `&[T]`) cannot be borrowed as a [`Sequence`] and are
/// viewed up front.
#[derive(Clone)]
pub struct Elements<'a>(Source<'a>);

#[derive(Clone)]
enum Source<'a> {
    Borrowed(&'a dyn Sequence),
    Viewed(Vec<Value<'a>>),
}

impl<'a> Elements<'a> {
    pub fn new(sequence: &'a dyn Sequence) -> Self {
        Elements(Source::Borrowed(sequence))
    }

    pub fn len(&self) -> usize {
        match &self.0 {
            Source::Borrowed(sequence) => sequence.len(),
            Source::Viewed(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element views, in order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = Value<'a>> + '_> {
        match &self.0 {
            Source::Borrowed(sequence) => {
                let sequence: &'a dyn Sequence = *sequence;
                sequence.elements()
            }
            Source::Viewed(values) => Box::new(values.iter().cloned()),
        }
    }
}

impl fmt::Debug for Elements<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> Value<'a> {
    /// Whether the value is absent.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text content, if this is character data.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Value::Text(text) => Some(*text),
            _ => None,
        }
    }

    /// Numeric value as a signed 64-bit integer.
    ///
    /// Unsigned values saturate at `i64::MAX` and floats truncate toward
    /// zero (saturating at the bounds, NaN becomes 0). Non-numeric values
    /// yield `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            Value::UInt(n) => Some(i64::try_from(n).unwrap_or(i64::MAX)),
            Value::Float(f) => Some(f as i64),
            _ => None,
        }
    }

    /// Whether the value is a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }

    /// Whether validation recurses into this value.
    ///
    /// Primitives, text and enum values are leaves.
    pub fn should_cascade(&self) -> bool {
        matches!(
            self,
            Value::Object(_) | Value::Array(_) | Value::Collection(_)
        )
    }

    /// Short name of the value's kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Collection(_) => "collection",
        }
    }

    /// Owned rendering of the value for a violation report.
    ///
    /// Objects render as their type name and sequences as their length;
    /// `Null` has no snapshot.
    pub fn snapshot(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Char(c) => Some(c.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::UInt(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(text) => Some((*text).to_string()),
            Value::Enum(variant) => Some((*variant).to_string()),
            Value::Object(object) => Some(object.type_name().to_string()),
            Value::Array(items) | Value::Collection(items) => {
                Some(format!("[{} items]", items.len()))
            }
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Value::Enum(variant) => f.debug_tuple("Enum").field(variant).finish(),
            Value::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Collection(items) => f.debug_tuple("Collection").field(items).finish(),
        }
    }
}

/// Types whose values the validator can look at.
///
/// Implemented here for primitives, strings, smart pointers, `Option`
/// and the standard collections. `#[derive(Validate)]` implements it for
/// structs and `#[derive(Reflect)]` for enums.
pub trait Reflect {
    /// View of the value.
    fn reflect(&self) -> Value<'_>;
}

macro_rules! reflect_as {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl Reflect for $ty {
                fn reflect(&self) -> Value<'_> {
                    Value::$variant(*self as $target)
                }
            }
        )+
    };
}

reflect_as!(Int as i64: i8, i16, i32, i64, isize);
reflect_as!(UInt as u64: u8, u16, u32, u64, usize);
reflect_as!(Float as f64: f32, f64);

impl Reflect for bool {
    fn reflect(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Reflect for char {
    fn reflect(&self) -> Value<'_> {
        Value::Char(*self)
    }
}

impl Reflect for str {
    fn reflect(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl Reflect for String {
    fn reflect(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl Reflect for Cow<'_, str> {
    fn reflect(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Value<'_> {
        match self {
            Some(value) => value.reflect(),
            None => Value::Null,
        }
    }
}

macro_rules! reflect_through {
    ($($ptr:ident),+) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $ptr<T> {
                fn reflect(&self) -> Value<'_> {
                    (**self).reflect()
                }
            }
        )+
    };
}

reflect_through!(Box, Rc, Arc);

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Value<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Value<'_> {
        Value::Array(Elements(Source::Viewed(
            self.iter().map(Reflect::reflect).collect(),
        )))
    }
}

macro_rules! sequence {
    ($variant:ident: $($ty:ty => [$($bound:tt)*]),+ $(,)?) => {
        $(
            impl<$($bound)*> Sequence for $ty {
                fn len(&self) -> usize {
                    self.iter().len()
                }

                fn elements(&self) -> Box<dyn Iterator<Item = Value<'_>> + '_> {
                    Box::new(self.iter().map(Reflect::reflect))
                }
            }

            impl<$($bound)*> Reflect for $ty {
                fn reflect(&self) -> Value<'_> {
                    Value::$variant(Elements::new(self))
                }
            }
        )+
    };
}

sequence!(Array:
    Vec<T> => [T: Reflect],
    [T; N] => [T: Reflect, const N: usize],
);

sequence!(Collection:
    VecDeque<T> => [T: Reflect],
    LinkedList<T> => [T: Reflect],
    HashSet<T, S> => [T: Reflect, S],
    BTreeSet<T> => [T: Reflect],
);
