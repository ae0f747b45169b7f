use pretty_assertions::assert_eq;
use sovran_typegen::{
    Generator, RegistryConfig, RegistryError, TemplateGenerator, TypeGenerator, TypeIdentity,
    TypeRegistry,
};

struct Int;
struct Double;
struct PairIntDouble;

#[derive(Debug, Clone, PartialEq)]
struct ExposedClass {
    name: &'static str,
}

fn pair_registry() -> Result<TypeRegistry<ExposedClass>, RegistryError> {
    let registry = TypeRegistry::new();
    registry.register_type(TypeIdentity::of::<Int>(), ExposedClass { name: "Int" })?;
    registry.register_type(TypeIdentity::of::<Double>(), ExposedClass { name: "Double" })?;
    registry.register_instance(
        "pair",
        vec![TypeIdentity::of::<Int>(), TypeIdentity::of::<Double>()].into(),
        TypeIdentity::of::<PairIntDouble>(),
    )?;
    registry.register_type(TypeIdentity::of::<PairIntDouble>(), ExposedClass { name: "V" })?;
    registry.finish()?;
    Ok(registry)
}

#[test]
fn test_end_to_end_pair() -> Result<(), RegistryError> {
    let registry = pair_registry()?;
    let pair = TemplateGenerator::new("pair");
    let int = TypeGenerator::of::<Int>();
    let double = TypeGenerator::of::<Double>();

    let exposed = pair.resolve(&registry, &[int.clone(), double.clone()])?;
    assert_eq!(exposed, ExposedClass { name: "V" });

    let result = pair.resolve(&registry, &[double, int]);
    assert!(matches!(result, Err(RegistryError::UnknownInstance { .. })));
    Ok(())
}

#[test]
fn test_instance_returns_concrete_generator() -> Result<(), RegistryError> {
    let registry = pair_registry()?;
    let concrete = TemplateGenerator::new("pair").instance(
        &registry,
        &[TypeGenerator::of::<Int>(), TypeGenerator::of::<Double>()],
    )?;

    assert_eq!(concrete, TypeGenerator::of::<PairIntDouble>());
    assert_eq!(concrete.resolve(&registry)?.name, "V");
    Ok(())
}

#[test]
fn test_index_is_single_element_tuple() -> Result<(), RegistryError> {
    struct Boxed;

    let registry = TypeRegistry::<&str>::new();
    registry.expose_instance::<Boxed, (Int,)>("box", "box_int")?;
    registry.finish()?;

    let boxed = TemplateGenerator::new("box");
    let int = TypeGenerator::of::<Int>();
    assert_eq!(boxed.index(&registry, &int)?, "box_int");
    assert_eq!(
        boxed.index(&registry, &int)?,
        boxed.resolve(&registry, std::slice::from_ref(&int))?
    );

    // Arity matters: [Int, Int] is not [Int].
    assert!(matches!(
        boxed.resolve(&registry, &[int.clone(), int]),
        Err(RegistryError::UnknownInstance { .. })
    ));
    Ok(())
}

#[test]
fn test_unknown_type_message_names_the_type() {
    let registry = TypeRegistry::<u8>::new();
    let err = TypeGenerator::of::<Option<Double>>()
        .resolve(&registry)
        .unwrap_err();
    assert_eq!(err.to_string(), "the type 'Option<Double>' has not been registered");
}

#[test]
fn test_unknown_template_message() {
    let registry = TypeRegistry::<u8>::new();
    let err = TemplateGenerator::new("polynomial")
        .resolve(&registry, &[])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "no instance of the template 'polynomial' has been registered"
    );
}

#[test]
fn test_describe_with_failing_demangler() -> Result<(), RegistryError> {
    fn always_fails(_: &str) -> Option<String> {
        None
    }

    let config = RegistryConfig::default().with_demangler(always_fails);
    let registry = TypeRegistry::<u8>::with_config(config);
    let generator = registry.expose::<Vec<Int>>(0)?;

    let description = generator.describe();
    assert!(!description.is_empty());
    assert!(description.contains(generator.type_name()));
    Ok(())
}

#[test]
fn test_namespace_attributes() -> Result<(), RegistryError> {
    let registry = TypeRegistry::<&str>::new();
    registry.expose::<Int>("int")?;
    registry.define_type::<Int>("int")?;
    registry.define_template("pair")?;

    let err = registry.define_type::<Double>("int").unwrap_err();
    assert_eq!(
        err.to_string(),
        "an attribute called 'int' already exists in the types namespace \
         (Type generator for the type 'Int')"
    );
    registry.finish()?;

    assert_eq!(
        registry.attribute_names()?,
        vec!["int".to_string(), "pair".to_string()]
    );
    match registry.attribute("int")? {
        Generator::Type(g) => assert_eq!(g.resolve(&registry)?, "int"),
        other => panic!("expected a type generator, got {:?}", other),
    }
    assert!(matches!(
        registry.attribute("double"),
        Err(RegistryError::UnknownAttribute { .. })
    ));

    registry.teardown()?;
    assert!(registry.attribute_names()?.is_empty());
    Ok(())
}

#[test]
fn test_generators_cross_threads() -> Result<(), RegistryError> {
    let registry = pair_registry()?;
    let pair = TemplateGenerator::new("pair");
    let args = vec![TypeGenerator::of::<Int>(), TypeGenerator::of::<Double>()];

    let handle = {
        let registry = registry.clone();
        let pair = pair.clone();
        let args = args.clone();
        std::thread::spawn(move || pair.resolve(&registry, &args))
    };

    assert_eq!(handle.join().unwrap()?, pair.resolve(&registry, &args)?);
    Ok(())
}
