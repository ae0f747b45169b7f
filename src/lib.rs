//! # sovran-typegen
//!
//! A runtime registry that names and resolves compile-time generic instantiations.
//!
//! A build that instantiates generic types over many argument combinations
//! (say `Polynomial<K, C>` over several monomial and coefficient types) ends up
//! with a large but fixed family of concrete types. `sovran-typegen` lets a
//! dynamically-driven caller refer to those types by identity, ask which
//! concrete type corresponds to "template `T` applied to `(A, B, ...)`", and
//! fetch the object that exposes that type, while rejecting accidental
//! double registration.
//!
//! ## Key Features
//!
//! - **Type identities**: comparable, hashable tokens built on `TypeId`, with readable names
//! - **Template resolution**: template name + ordered argument types → concrete type → exposed object
//! - **Loud duplicates**: registering a type or an instance twice is an error, never an overwrite
//! - **Explicit lifecycle**: populate, then query, then tear down
//! - **Thread-safe queries**: built on `Arc<RwLock<_>>`
//!
//! ## Usage Examples
//!
//! ### Exposing Types and Instances
//!
//! ```rust
//! use sovran_typegen::{RegistryConfig, RegistryError, TypeRegistry};
//!
//! struct Rational;
//! struct PackedMonomial;
//! struct Polynomial<K, C>(K, C);
//!
//! fn main() -> Result<(), RegistryError> {
//!     // The exposed object can be anything clonable; here, a class name.
//!     let registry = TypeRegistry::<String>::bootstrap(RegistryConfig::default(), |r| {
//!         r.expose::<f64>("double".to_string())?;
//!         r.expose::<Rational>("rational".to_string())?;
//!         r.expose::<PackedMonomial>("packed_monomial".to_string())?;
//!
//!         r.expose_instance::<Polynomial<PackedMonomial, f64>, (PackedMonomial, f64)>(
//!             "polynomial",
//!             "polynomial_pm_double".to_string(),
//!         )?;
//!         r.expose_instance::<Polynomial<PackedMonomial, Rational>, (PackedMonomial, Rational)>(
//!             "polynomial",
//!             "polynomial_pm_rational".to_string(),
//!         )?;
//!         Ok(())
//!     })?;
//!
//!     let polynomial = registry.template_generator("polynomial");
//!     let key = registry.type_generator::<PackedMonomial>();
//!     let cf = registry.type_generator::<Rational>();
//!
//!     let exposed = polynomial.resolve(&registry, &[key, cf])?;
//!     println!("{}", exposed);
//!     Ok(())
//! }
//! ```
//!
//! ### Publishing Generators by Name
//!
//! ```rust
//! use sovran_typegen::{Generator, RegistryError, TypeRegistry};
//!
//! fn main() -> Result<(), RegistryError> {
//!     let registry = TypeRegistry::<u32>::new();
//!     registry.expose::<f64>(1)?;
//!     registry.expose_instance::<Vec<f64>, (f64,)>("vector", 2)?;
//!
//!     registry.define_type::<f64>("double")?;
//!     registry.define_template("vector")?;
//!     registry.finish()?;
//!
//!     // A caller that only knows names.
//!     let double = match registry.attribute("double")? {
//!         Generator::Type(g) => g,
//!         other => panic!("unexpected {}", other.describe()),
//!     };
//!     let vector = match registry.attribute("vector")? {
//!         Generator::Template(g) => g,
//!         other => panic!("unexpected {}", other.describe()),
//!     };
//!
//!     assert_eq!(vector.index(&registry, &double)?, 2);
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_typegen::{RegistryError, TemplateGenerator, TypeGenerator, TypeRegistry};
//!
//! let registry = TypeRegistry::<&str>::new();
//! if let Err(e) = registry.expose_instance::<(i32, f64), (i32, f64)>("pair", "pair_int_double") {
//!     eprintln!("Failed to expose pair: {}", e);
//!     return;
//! }
//!
//! let pair = TemplateGenerator::new("pair");
//! let int = TypeGenerator::of::<i32>();
//! let double = TypeGenerator::of::<f64>();
//!
//! match pair.resolve(&registry, &[double.clone(), int.clone()]) {
//!     Ok(exposed) => println!("Exposed: {}", exposed),
//!     Err(RegistryError::UnknownTemplate { template }) => println!("No template {}", template),
//!     Err(RegistryError::UnknownInstance { args, .. }) => println!("Not built for {}", args),
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! match TemplateGenerator::new("pari").resolve(&registry, &[int, double]) {
//!     Err(RegistryError::UnknownTemplate { .. }) => println!("Typo in the template name"),
//!     other => println!("Unexpected: {:?}", other),
//! }
//! ```

mod argument_key;
mod error;
mod exposed;
mod generator;
mod namespace;
mod registry;
mod template_map;
mod type_identity;

pub use argument_key::{ArgumentKey, TypeList};
pub use error::{RegistryError, Result};
pub use exposed::ExposedTypeMap;
pub use generator::{TemplateGenerator, TypeGenerator};
pub use namespace::{Generator, TypeNamespace};
pub use registry::{Phase, RegistryConfig, TypeRegistry};
pub use template_map::TemplateInstanceMap;
pub use type_identity::{demangle, Demangler, TypeIdentity};

// Re-export std::any for convenience
pub use std::any::{Any, TypeId};
