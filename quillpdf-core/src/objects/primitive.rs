use crate::objects::Dictionary;
use std::fmt;

/// Identity of an indirect object: object number plus generation.
///
/// Object number `0` means "not numbered yet". Numbers `1` and `2` are
/// reserved for the document catalog and the root page list; everything else
/// is handed out lazily by an [`ObjectCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectId {
    number: u32,
    generation: u16,
}

impl ObjectId {
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }

    /// An identity that has not been numbered yet.
    pub fn unassigned() -> Self {
        Self::default()
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    pub fn is_assigned(&self) -> bool {
        self.number != 0
    }

    /// Assigns the next number from `counter` unless this identity already
    /// has one. Calling it again is a no-op.
    pub fn assign(&mut self, counter: &mut ObjectCounter) {
        if self.number == 0 {
            self.number = counter.next();
            self.generation = 0;
        }
    }

    /// Renders the `N G R` token. Unnumbered identities render as `0 0 R`.
    pub fn indirect_reference(&self) -> String {
        self.to_string()
    }

    /// Wraps an object body in the `N G obj ... endobj` envelope.
    pub(crate) fn bracket(&self, body: &str) -> String {
        format!(
            "{} {} obj\n{}\nendobj\n",
            self.number, self.generation, body
        )
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// Hands out object numbers for a single document build.
///
/// Seeded at 2 so the first number handed out is 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCounter {
    count: u32,
}

impl ObjectCounter {
    pub const CATALOG: u32 = 1;
    pub const ROOT_PAGES: u32 = 2;

    pub fn new() -> Self {
        Self {
            count: Self::ROOT_PAGES,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        self.count += 1;
        self.count
    }

    /// The last number handed out (2 when nothing has been numbered).
    pub fn current(&self) -> u32 {
        self.count
    }
}

impl Default for ObjectCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Name(String),
    /// Pre-rendered token emitted verbatim, e.g. a hex string.
    Raw(String),
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Reference(ObjectId),
}

impl Object {
    pub fn name(name: impl Into<String>) -> Self {
        Object::Name(name.into())
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => f.write_str("null"),
            Object::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Object::Integer(i) => write!(f, "{i}"),
            Object::Real(r) => f.write_str(&format_real(*r)),
            Object::String(s) => write!(f, "({})", escape_literal(s)),
            Object::Name(n) => write!(f, "/{n}"),
            Object::Raw(raw) => f.write_str(raw),
            Object::Array(arr) => {
                f.write_str("[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{obj}")?;
                }
                f.write_str("]")
            }
            Object::Dictionary(dict) => write!(f, "{dict}"),
            Object::Reference(id) => write!(f, "{id}"),
        }
    }
}

fn format_real(value: f64) -> String {
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn escape_literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Boolean(b)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<u32> for Object {
    fn from(i: u32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<usize> for Object {
    fn from(i: usize) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<f64> for Object {
    fn from(f: f64) -> Self {
        Object::Real(f)
    }
}

impl From<ObjectId> for Object {
    fn from(id: ObjectId) -> Self {
        Object::Reference(id)
    }
}

impl From<Dictionary> for Object {
    fn from(dict: Dictionary) -> Self {
        Object::Dictionary(dict)
    }
}

impl From<Vec<Object>> for Object {
    fn from(arr: Vec<Object>) -> Self {
        Object::Array(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_identity_renders_zero_reference() {
        let id = ObjectId::unassigned();
        assert!(!id.is_assigned());
        assert_eq!(id.indirect_reference(), "0 0 R");
    }

    #[test]
    fn test_assign_is_idempotent() {
        let mut counter = ObjectCounter::new();
        let mut id = ObjectId::unassigned();

        id.assign(&mut counter);
        let first = id;
        id.assign(&mut counter);

        assert_eq!(id, first);
        assert_eq!(id.number(), 3);
        assert_eq!(id.generation(), 0);
        assert_eq!(counter.current(), 3);
    }

    #[test]
    fn test_assign_keeps_reserved_numbers() {
        let mut counter = ObjectCounter::new();
        let mut catalog = ObjectId::new(ObjectCounter::CATALOG, 0);
        catalog.assign(&mut counter);
        assert_eq!(catalog.number(), 1);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_counter_starts_after_reserved() {
        let mut counter = ObjectCounter::new();
        assert_eq!(counter.next(), 3);
        assert_eq!(counter.next(), 4);
        assert_eq!(counter.next(), 5);
    }

    #[test]
    fn test_bracket() {
        let id = ObjectId::new(12, 0);
        assert_eq!(id.bracket("<<>>"), "12 0 obj\n<<>>\nendobj\n");
    }

    #[test]
    fn test_object_display() {
        assert_eq!(Object::Null.to_string(), "null");
        assert_eq!(Object::Boolean(true).to_string(), "true");
        assert_eq!(Object::Integer(-42).to_string(), "-42");
        assert_eq!(Object::Real(12.5).to_string(), "12.5");
        assert_eq!(Object::Real(3.0).to_string(), "3");
        assert_eq!(Object::Real(-0.0000001).to_string(), "0");
        assert_eq!(Object::name("Type").to_string(), "/Type");
        assert_eq!(
            Object::String("a (b) \\c".to_string()).to_string(),
            "(a \\(b\\) \\\\c)"
        );
        assert_eq!(
            Object::Array(vec![Object::Integer(1), ObjectId::new(3, 0).into()]).to_string(),
            "[1 3 0 R]"
        );
        assert_eq!(Object::Raw("<0041>".to_string()).to_string(), "<0041>");
    }
}
