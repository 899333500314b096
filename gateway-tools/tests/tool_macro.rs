use gateway_tools::{ToolArgs, ToolBinding, ToolError, ToolProvider, ToolRegistry, tool};

struct Counter {
    prefix: &'static str,
}

#[tool(name = "test:greet", description = "Greets someone")]
fn greet(
    counter: &Counter,
    #[param(rename = "personName", description = "Who to greet")] person: String,
    #[param(description = "Greeting word", default = "hello")] word: String,
    #[param(description = "Trailing punctuation")] suffix: Option<String>,
) -> String {
    format!(
        "{}{word} {person}{}",
        counter.prefix,
        suffix.unwrap_or_default()
    )
}

#[tool(name = "test:shout", description = "Upper-cases text")]
fn shout(#[param(description = "Text to shout")] text: String) -> String {
    text.to_uppercase()
}

struct TestTools;

impl ToolProvider<Counter> for TestTools {
    fn bindings() -> Vec<ToolBinding<Counter>> {
        vec![greet_binding(), shout_binding()]
    }
}

fn registry() -> ToolRegistry<Counter> {
    ToolRegistry::builder()
        .register_provider::<TestTools>()
        .expect("valid tools")
        .build()
}

#[test]
fn descriptor_carries_names_and_parameters() {
    let binding = greet_binding();
    let descriptor = binding.descriptor();

    assert_eq!(descriptor.name(), "test:greet");
    assert_eq!(descriptor.description(), "Greets someone");

    let params: Vec<_> = descriptor
        .parameters()
        .iter()
        .map(|param| (param.name(), param.required()))
        .collect();
    assert_eq!(
        params,
        [("personName", true), ("word", false), ("suffix", false)]
    );
    assert_eq!(descriptor.parameters()[0].description(), "Who to greet");
}

#[test]
fn handler_reads_arguments_and_defaults() {
    let registry = registry();
    let counter = Counter { prefix: "> " };

    let args = ToolArgs::new().with("personName", "Ada");
    let output = registry.call(&counter, "test:greet", &args).unwrap();
    assert_eq!(output, "> hello Ada");

    let args = ToolArgs::new()
        .with("personName", "Ada")
        .with("word", "hi")
        .with("suffix", "!");
    let output = registry.call(&counter, "test:greet", &args).unwrap();
    assert_eq!(output, "> hi Ada!");
}

#[test]
fn missing_required_argument_is_an_error() {
    let registry = registry();
    let err = registry
        .call(&Counter { prefix: "" }, "test:greet", &ToolArgs::new())
        .expect_err("personName required");
    assert!(matches!(err, ToolError::MissingArgument { name } if name == "personName"));
}

#[test]
fn context_free_tools_bind_to_any_context() {
    let registry = registry();
    let args = ToolArgs::new().with("text", "quiet");
    let output = registry
        .call(&Counter { prefix: "" }, "test:shout", &args)
        .unwrap();
    assert_eq!(output, "QUIET");

    let unit_binding: ToolBinding<()> = shout_binding();
    assert_eq!(unit_binding.invoke(&(), &args).unwrap(), "QUIET");
}

#[test]
fn annotated_function_remains_callable() {
    assert_eq!(shout("abc".into()), "ABC");
    assert_eq!(
        greet(&Counter { prefix: "" }, "Bo".into(), "yo".into(), None),
        "yo Bo"
    );
}
