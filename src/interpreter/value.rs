use std::{
    cell::RefCell,
    collections::{hash_map::DefaultHasher, HashMap},
    hash::{Hash, Hasher},
    rc::Rc,
};

use ordered_float::OrderedFloat;

use crate::interpreter::types::{Category, Type};

/// A runtime value: a static [`Type`] paired with a [`Payload`] that fits
/// its category.
///
/// Values are immutable. "Mutating" a variable always means building a new
/// `Value` and storing it into the variable's cell. The one exception is
/// element updates on arrays and dictionaries, which go through the shared
/// container inside the payload while the `Value` itself stays put, so
/// every clone of an array or dictionary value observes the update.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// The static type of this value.
    pub ty: Type,
    /// The runtime representation.
    pub payload: Payload,
}

/// The runtime representation of a [`Value`], one variant per category.
///
/// Containers store bare payloads rather than full values. The element
/// type lives once in the owning value's `Array<T>`/`Dict<K,V>` type, and
/// indexing re-wraps the stored payload with that inner type.
#[derive(Debug, Clone)]
pub enum Payload {
    Bool(bool),
    Int(i32),
    Float(f32),
    Char(char),
    Str(String),
    /// Shared, in-place mutable element storage.
    Array(Rc<RefCell<Vec<Payload>>>),
    /// Shared, in-place mutable entry storage; keys are unique.
    Dict(Rc<RefCell<HashMap<Payload, Payload>>>),
}

impl Value {
    /// Pairs a type with a payload.
    ///
    /// The payload's variant must fit the type's category; a mismatch is a
    /// bug in the interpreter, not a language error, and trips the debug
    /// assertion.
    #[must_use]
    pub fn new(ty: Type, payload: Payload) -> Self {
        debug_assert!(
            ty.category() == payload.category(),
            "payload does not fit type {ty}",
        );
        Self { ty, payload }
    }

    /// Builds an array value over fresh element storage.
    #[must_use]
    pub fn array(element: Type, items: Vec<Payload>) -> Self {
        Self::new(
            Type::Array(Box::new(element)),
            Payload::Array(Rc::new(RefCell::new(items))),
        )
    }

    /// Builds a dictionary value over fresh entry storage.
    #[must_use]
    pub fn dict(key: Type, value: Type, entries: HashMap<Payload, Payload>) -> Self {
        Self::new(
            Type::Dict(Box::new(key), Box::new(value)),
            Payload::Dict(Rc::new(RefCell::new(entries))),
        )
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::new(Type::Bool, Payload::Bool(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::new(Type::Int, Payload::Int(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::new(Type::Float, Payload::Float(v))
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::new(Type::Char, Payload::Char(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::new(Type::String, Payload::Str(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::new(Type::String, Payload::Str(v.to_string()))
    }
}

impl Payload {
    /// The category this payload variant belongs to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Bool(_) => Category::Bool,
            Self::Int(_) => Category::Int,
            Self::Float(_) => Category::Float,
            Self::Char(_) => Category::Char,
            Self::Str(_) => Category::String,
            Self::Array(_) => Category::Array,
            Self::Dict(_) => Category::Dict,
        }
    }
}

/// Payload equality is total: floats compare through [`OrderedFloat`] so
/// `NaN` equals itself, and containers compare by their current contents.
impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            },
            (Self::Dict(a), Self::Dict(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl Eq for Payload {}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Bool(b) => {
                state.write_u8(0);
                b.hash(state);
            },
            Self::Int(i) => {
                state.write_u8(1);
                i.hash(state);
            },
            Self::Float(x) => {
                state.write_u8(2);
                OrderedFloat(*x).hash(state);
            },
            Self::Char(c) => {
                state.write_u8(3);
                c.hash(state);
            },
            Self::Str(s) => {
                state.write_u8(4);
                s.hash(state);
            },
            Self::Array(items) => {
                state.write_u8(5);
                for item in items.borrow().iter() {
                    item.hash(state);
                }
            },
            Self::Dict(entries) => {
                state.write_u8(6);
                // Entry order is arbitrary, so combine per-entry hashes
                // order-insensitively.
                let mut hashes: Vec<u64> = entries
                    .borrow()
                    .iter()
                    .map(|entry| {
                        let mut hasher = DefaultHasher::new();
                        entry.hash(&mut hasher);
                        hasher.finish()
                    })
                    .collect();
                hashes.sort_unstable();

                let mut combined: u64 = 0;
                for h in hashes {
                    combined = combined.wrapping_add(h);
                }
                combined.hash(state);
            },
        }
    }
}

/// The bare textual form used by `print` and `toString`.
impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug float formatting keeps the decimal point on whole
            // values (`1.0`, not `1`).
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
            Self::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            },
        }
    }
}

/// The debug form used by `dump`: the static type name wrapping the
/// payload, e.g. `Int(3)` or `Array<Int>([1, 2])`.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.ty, self.payload)
    }
}
