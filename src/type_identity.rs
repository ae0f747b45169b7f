use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic;
use std::sync::{Arc, OnceLock};

/// Turns a raw compiler type name into a readable one, or gives up with `None`
pub type Demangler = fn(&str) -> Option<String>;

/// Name rewriting used for diagnostics.
pub mod demangle {
    /// Strips module paths from every path in a type name.
    ///
    /// `alloc::vec::Vec<core::option::Option<i32>>` becomes `Vec<Option<i32>>`.
    /// Returns `None` for an empty name or unbalanced angle brackets.
    pub fn short_paths(raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }

        let mut out = String::with_capacity(raw.len());
        let mut word = String::new();
        let mut depth = 0usize;
        let mut prev = None;

        for c in raw.chars() {
            if c.is_alphanumeric() || c == '_' || c == ':' {
                word.push(c);
            } else {
                push_last_segment(&mut out, &word);
                word.clear();
                match c {
                    '<' => depth += 1,
                    // `->` in fn signatures is not a closing bracket
                    '>' if prev != Some('-') => depth = depth.checked_sub(1)?,
                    _ => {}
                }
                out.push(c);
            }
            prev = Some(c);
        }
        push_last_segment(&mut out, &word);

        (depth == 0).then_some(out)
    }

    /// Keeps the raw name as is.
    pub fn verbatim(raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    fn push_last_segment(out: &mut String, word: &str) {
        match word.rfind("::") {
            Some(idx) if idx + 2 < word.len() => out.push_str(&word[idx + 2..]),
            _ => out.push_str(word),
        }
    }
}

/// An opaque token standing for exactly one compile-time type.
///
/// Equality and hashing look only at the underlying `TypeId`, so two
/// spellings of the same type (for example through a `type` alias) produce
/// equal identities. Clones share the lazily computed display name.
///
/// # Examples
///
/// ```
/// use sovran_typegen::TypeIdentity;
///
/// type Coefficient = f64;
///
/// let a = TypeIdentity::of::<f64>();
/// let b = TypeIdentity::of::<Coefficient>();
/// assert_eq!(a, b);
/// assert_ne!(a, TypeIdentity::of::<f32>());
///
/// let v = TypeIdentity::of::<Vec<String>>();
/// assert_eq!(v.display_name(), "Vec<String>");
/// assert_eq!(v.raw_name(), "alloc::vec::Vec<alloc::string::String>");
/// ```
#[derive(Clone)]
pub struct TypeIdentity {
    id: TypeId,
    raw_name: &'static str,
    demangler: Demangler,
    display: Arc<OnceLock<String>>,
}

impl TypeIdentity {
    /// Identity of `T`, rendered with the default demangler
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::with_demangler::<T>(demangle::short_paths)
    }

    /// Identity of `T`, rendered with a specific demangler
    pub fn with_demangler<T: ?Sized + 'static>(demangler: Demangler) -> Self {
        Self {
            id: TypeId::of::<T>(),
            raw_name: type_name::<T>(),
            demangler,
            display: Arc::new(OnceLock::new()),
        }
    }

    /// The underlying `TypeId`
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Check if this identity stands for type `T`
    pub fn is_type<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The compiler-provided name, unmodified
    pub fn raw_name(&self) -> &'static str {
        self.raw_name
    }

    /// The readable name used in diagnostics.
    ///
    /// Falls back to the raw name when the demangler gives up, returns an
    /// empty string, or panics.
    pub fn display_name(&self) -> &str {
        self.display.get_or_init(|| {
            let (demangler, raw) = (self.demangler, self.raw_name);
            match panic::catch_unwind(move || demangler(raw)) {
                Ok(Some(name)) if !name.is_empty() => name,
                _ => raw.to_string(),
            }
        })
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeIdentity")
            .field(&self.display_name())
            .finish()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::hash_map::DefaultHasher;
    use test_case::test_case;

    fn hash_of(identity: &TypeIdentity) -> u64 {
        let mut hasher = DefaultHasher::new();
        identity.hash(&mut hasher);
        hasher.finish()
    }

    struct Rational;

    #[test]
    fn same_type_is_equal_and_hashes_identically() {
        let a = TypeIdentity::of::<Rational>();
        let b = TypeIdentity::of::<Rational>();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert!(a.is_type::<Rational>());
    }

    #[test]
    fn distinct_types_differ() {
        assert_ne!(TypeIdentity::of::<i32>(), TypeIdentity::of::<i64>());
        assert_ne!(TypeIdentity::of::<Vec<i32>>(), TypeIdentity::of::<Vec<u32>>());
        assert_ne!(TypeIdentity::of::<str>(), TypeIdentity::of::<String>());
    }

    #[test]
    fn demangler_does_not_affect_identity() {
        let a = TypeIdentity::of::<u8>();
        let b = TypeIdentity::with_demangler::<u8>(demangle::verbatim);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn failing_demangler_falls_back_to_raw_name() {
        fn broken(_: &str) -> Option<String> {
            None
        }
        fn blank(_: &str) -> Option<String> {
            Some(String::new())
        }

        let a = TypeIdentity::with_demangler::<Vec<u8>>(broken);
        assert_eq!(a.display_name(), "alloc::vec::Vec<u8>");

        let b = TypeIdentity::with_demangler::<Vec<u8>>(blank);
        assert_eq!(b.display_name(), "alloc::vec::Vec<u8>");
    }

    #[test]
    fn panicking_demangler_falls_back_to_raw_name() {
        fn explode(_: &str) -> Option<String> {
            panic!("demangler blew up")
        }

        let identity = TypeIdentity::with_demangler::<Rational>(explode);
        assert_eq!(identity.display_name(), identity.raw_name());
    }

    #[test]
    fn display_name_is_shared_between_clones() {
        let a = TypeIdentity::of::<Option<String>>();
        let b = a.clone();
        assert_eq!(a.display_name(), "Option<String>");
        assert!(std::ptr::eq(a.display_name(), b.display_name()));
    }

    #[test_case("alloc::vec::Vec<core::option::Option<i32>>", Some("Vec<Option<i32>>") ; "nested generics")]
    #[test_case("(i32, alloc::string::String)", Some("(i32, String)") ; "tuple")]
    #[test_case("fn(i32) -> i32", Some("fn(i32) -> i32") ; "fn arrow")]
    #[test_case("&[u8; 4]", Some("&[u8; 4]") ; "array reference")]
    #[test_case("Vec<i32", None ; "unclosed bracket")]
    #[test_case("i32>", None ; "stray closing bracket")]
    #[test_case("", None ; "empty")]
    fn short_paths_cases(raw: &str, expected: Option<&str>) {
        assert_eq!(demangle::short_paths(raw).as_deref(), expected);
    }
}
