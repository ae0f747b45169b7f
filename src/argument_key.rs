use std::fmt;
use std::hash::{Hash, Hasher};

use crate::generator::TypeGenerator;
use crate::type_identity::{demangle, Demangler, TypeIdentity};

/// The ordered parameter list of one generic instantiation.
///
/// Two keys are equal only if they have the same length and pairwise equal
/// identities in the same order: `[A, B]` and `[B, A]` are different keys, and
/// so are `[A]` and `[A, A]`.
///
/// # Examples
///
/// ```
/// use sovran_typegen::{ArgumentKey, TypeIdentity};
///
/// let key = ArgumentKey::of::<(i64, f64)>();
/// assert_eq!(key.arity(), 2);
/// assert_eq!(
///     key,
///     ArgumentKey::new(vec![TypeIdentity::of::<i64>(), TypeIdentity::of::<f64>()])
/// );
/// assert_ne!(key, ArgumentKey::of::<(f64, i64)>());
/// assert_eq!(key.to_string(), "[i64, f64]");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArgumentKey {
    args: Vec<TypeIdentity>,
}

impl ArgumentKey {
    /// Creates a key from an ordered list of identities
    pub fn new(args: Vec<TypeIdentity>) -> Self {
        Self { args }
    }

    /// Creates a key from a tuple of types, e.g. `ArgumentKey::of::<(K, C)>()`
    pub fn of<L: TypeList>() -> Self {
        Self::new(L::identities())
    }

    /// Like [`of`](Self::of), rendering names with `demangler`
    pub fn of_with<L: TypeList>(demangler: Demangler) -> Self {
        Self::new(L::identities_with(demangler))
    }

    /// Creates a key from the identities of a slice of type generators
    pub fn from_generators(generators: &[TypeGenerator]) -> Self {
        generators.iter().map(|g| g.identity().clone()).collect()
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeIdentity> {
        self.args.iter()
    }

    pub fn as_slice(&self) -> &[TypeIdentity] {
        &self.args
    }
}

impl Hash for ArgumentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Arity first so that a prefix never collides with the full key.
        state.write_usize(self.args.len());
        for arg in &self.args {
            arg.hash(state);
        }
    }
}

impl From<Vec<TypeIdentity>> for ArgumentKey {
    fn from(args: Vec<TypeIdentity>) -> Self {
        Self::new(args)
    }
}

impl FromIterator<TypeIdentity> for ArgumentKey {
    fn from_iter<I: IntoIterator<Item = TypeIdentity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ArgumentKey {
    type Item = &'a TypeIdentity;
    type IntoIter = std::slice::Iter<'a, TypeIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(arg.display_name())?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgumentKey{}", self)
    }
}

/// A compile-time list of types, implemented for tuples of up to eight elements.
pub trait TypeList {
    /// The identities of the listed types, in order
    fn identities_with(demangler: Demangler) -> Vec<TypeIdentity>;

    fn identities() -> Vec<TypeIdentity> {
        Self::identities_with(demangle::short_paths)
    }
}

impl TypeList for () {
    fn identities_with(_: Demangler) -> Vec<TypeIdentity> {
        Vec::new()
    }
}

macro_rules! impl_type_list {
    ($($name:ident),+) => {
        impl<$($name: 'static),+> TypeList for ($($name,)+) {
            fn identities_with(demangler: Demangler) -> Vec<TypeIdentity> {
                vec![$(TypeIdentity::with_demangler::<$name>(demangler)),+]
            }
        }
    };
}

impl_type_list!(A);
impl_type_list!(A, B);
impl_type_list!(A, B, C);
impl_type_list!(A, B, C, D);
impl_type_list!(A, B, C, D, E);
impl_type_list!(A, B, C, D, E, F);
impl_type_list!(A, B, C, D, E, F, G);
impl_type_list!(A, B, C, D, E, F, G, H);
