//! Demonstrates an exposition layer publishing polynomial instantiations and a
//! caller that picks them by name.
//!
//! The "build" instantiates `Polynomial<K, C>` for every monomial type `K` and
//! coefficient type `C`. Each concrete type gets an exposed class; the caller
//! only knows attribute names like `polynomial`, `double` or `packed_monomial`.
//!
//! Run with: cargo run --example polynomials

use sovran_typegen::{Generator, RegistryConfig, RegistryError, TypeGenerator, TypeRegistry};
use std::sync::Arc;

fn main() -> Result<(), RegistryError> {
    let registry = TypeRegistry::bootstrap(RegistryConfig::default(), expose_all)?;

    // A caller that only has names to work with.
    let polynomial = match registry.attribute("polynomial")? {
        Generator::Template(g) => g,
        other => panic!("polynomial should be a template, got {}", other.describe()),
    };
    let key = attribute_type(&registry, "packed_monomial")?;

    println!("{}", polynomial);
    for cf in ["double", "integer", "rational"] {
        let cf = attribute_type(&registry, cf)?;
        let class = polynomial.resolve(&registry, &[key.clone(), cf.clone()])?;
        println!("  [{}, {}] -> {}", key.identity(), cf.identity(), class.describe());
    }

    // Asking for a combination the build never produced.
    let double = attribute_type(&registry, "double")?;
    match polynomial.resolve(&registry, &[double.clone(), key.clone()]) {
        Ok(class) => println!("unexpected: {}", class.name),
        Err(e) => println!("\nExpected failure: {}", e),
    }

    registry.teardown()?;
    println!("\nAfter teardown: {:?}", double.resolve(&registry).map(|c| c.name.clone()));
    Ok(())
}

fn attribute_type(
    registry: &TypeRegistry<Arc<ExposedClass>>,
    name: &str,
) -> Result<TypeGenerator, RegistryError> {
    match registry.attribute(name)? {
        Generator::Type(g) => Ok(g),
        Generator::Template(_) => Err(RegistryError::NotA {
            name: name.to_string(),
            expected: "type generator",
        }),
    }
}

// ============================================================================
// Exposition layer - runs once, before anyone queries the registry
// ============================================================================

fn expose_all(registry: &TypeRegistry<Arc<ExposedClass>>) -> Result<(), RegistryError> {
    registry.expose::<f64>(ExposedClass::new::<f64>("double"))?;
    registry.expose::<Integer>(ExposedClass::new::<Integer>("integer"))?;
    registry.expose::<Rational>(ExposedClass::new::<Rational>("rational"))?;
    registry.expose::<PackedMonomial>(ExposedClass::new::<PackedMonomial>("packed_monomial"))?;
    registry.expose::<DPackedMonomial>(ExposedClass::new::<DPackedMonomial>("d_packed_monomial"))?;

    registry.define_type::<f64>("double")?;
    registry.define_type::<Integer>("integer")?;
    registry.define_type::<Rational>("rational")?;
    registry.define_type::<PackedMonomial>("packed_monomial")?;
    registry.define_type::<DPackedMonomial>("d_packed_monomial")?;

    expose_polynomials::<PackedMonomial>(registry)?;
    expose_polynomials::<DPackedMonomial>(registry)?;
    registry.define_template("polynomial")?;
    Ok(())
}

fn expose_polynomials<K: 'static>(
    registry: &TypeRegistry<Arc<ExposedClass>>,
) -> Result<(), RegistryError> {
    expose_polynomial::<K, f64>(registry)?;
    expose_polynomial::<K, Integer>(registry)?;
    expose_polynomial::<K, Rational>(registry)?;
    Ok(())
}

fn expose_polynomial<K: 'static, C: 'static>(
    registry: &TypeRegistry<Arc<ExposedClass>>,
) -> Result<(), RegistryError> {
    let count = registry.exposed_len()?;
    let class = ExposedClass::new::<Polynomial<K, C>>(&format!("_exposed_type_{}", count));
    registry.expose_instance::<Polynomial<K, C>, (K, C)>("polynomial", class)?;
    Ok(())
}

// ============================================================================
// Stand-ins for the types the build generates
// ============================================================================

struct Integer;
struct Rational;
struct PackedMonomial;
struct DPackedMonomial;
#[allow(dead_code)]
struct Polynomial<K, C>(K, C);

/// What the caller gets back: enough to construct instances in a real binding
#[derive(Debug)]
struct ExposedClass {
    name: String,
    type_name: &'static str,
}

impl ExposedClass {
    fn new<T: 'static>(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            type_name: std::any::type_name::<T>(),
        })
    }

    fn describe(&self) -> String {
        format!("class {} for {}", self.name, self.type_name)
    }
}
