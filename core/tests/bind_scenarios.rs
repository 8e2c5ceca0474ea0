use docopt_merge_core::{
    ArgMap, BindError, CoercionError, ContractViolation, Field, MergeError, MergeValue, Octal,
    Schema, Value, audit, bind,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
struct TestOpts {
    int: i32,
    oct: Octal,
    o: Octal,
    v: bool,
    q: bool,
    i: i64,
    f: f64,
    ai: Vec<i32>,
}

fn test_schema() -> Schema<TestOpts> {
    Schema::new()
        .field(Field::number("INT", |o: &mut TestOpts| &mut o.int))
        .field(Field::merge("OCT", |o: &mut TestOpts| &mut o.oct))
        .field(Field::merge("O", |o: &mut TestOpts| &mut o.o).key("-o"))
        .field(Field::boolean("V", |o: &mut TestOpts| &mut o.v).key("-v"))
        .field(Field::boolean("Q", |o: &mut TestOpts| &mut o.q).exclude())
        .field(Field::number("I", |o: &mut TestOpts| &mut o.i))
        .field(Field::number("F", |o: &mut TestOpts| &mut o.f))
        .field(Field::number_list("AI", |o: &mut TestOpts| &mut o.ai))
}

fn test_args() -> ArgMap {
    serde_json::from_value(serde_json::json!({
        "INT": "-3",
        "OCT": "0755",
        "-o": "0755",
        "-v": true,
        "I": "1",
        "F": "2e2",
        "AI": ["1", "2", "3"],
    }))
    .unwrap()
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn test_merge_scenario() {
    let mut opts = TestOpts {
        q: true,
        ..TestOpts::default()
    };
    bind(&test_schema(), &mut opts, &test_args()).unwrap();

    assert_eq!(opts.int, -3);
    assert_eq!(opts.oct, Octal(0o755));
    assert_eq!(opts.o, Octal(0o755));
    assert!(opts.v);
    assert!(opts.q, "excluded field keeps its initial value");
    assert_eq!(opts.i, 1);
    assert_eq!(opts.f, 200.0);
    assert_eq!(opts.ai, vec![1, 2, 3]);
}

#[test]
fn test_bind_is_idempotent() {
    let schema = test_schema();
    let args = test_args();

    let mut once = TestOpts::default();
    bind(&schema, &mut once, &args).unwrap();

    let mut twice = TestOpts::default();
    bind(&schema, &mut twice, &args).unwrap();
    bind(&schema, &mut twice, &args).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_scenario_passes_audit() {
    assert!(audit(&test_schema(), &test_args()).is_empty());
}

// ---------------------------------------------------------------------------
// Error classes
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_number_is_returned_not_fatal() {
    let mut args = test_args();
    args.insert("F".to_string(), Value::from("2e"));

    let mut opts = TestOpts::default();
    let err = bind(&test_schema(), &mut opts, &args).unwrap_err();
    assert!(!err.is_fatal());
    assert_eq!(err.key(), Some("F"));
    assert!(matches!(
        err,
        BindError::Coercion {
            source: CoercionError::Number(_),
            ..
        }
    ));
    assert_eq!(opts.f, 0.0);
}

#[test]
fn test_octal_rejection_names_key() {
    let mut args = test_args();
    args.insert("-o".to_string(), Value::Bool(true));

    let mut opts = TestOpts::default();
    let err = bind(&test_schema(), &mut opts, &args).unwrap_err();
    assert_eq!(err.to_string(), "-o: expected octal, got true");
    assert_eq!(opts.oct, Octal(0o755), "earlier fields stay bound");
    assert_eq!(opts.o, Octal(0));
}

#[test]
fn test_flag_with_text_is_contract_violation() {
    let mut args = test_args();
    args.insert("-v".to_string(), Value::from("true"));

    let mut opts = TestOpts::default();
    let err = bind(&test_schema(), &mut opts, &args).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(
        err,
        BindError::Contract(ContractViolation::ExpectedBool { .. })
    ));
}

#[test]
fn test_undocumented_key_is_contract_violation() {
    let mut args = test_args();
    args.remove("AI");

    let mut opts = TestOpts::default();
    let err = bind(&test_schema(), &mut opts, &args).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.key(), Some("AI"));

    assert_eq!(
        audit(&test_schema(), &args),
        vec![ContractViolation::MissingKey("AI".to_string())]
    );
}

// ---------------------------------------------------------------------------
// Scalar arity
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Scalars {
    name: String,
    count: u16,
}

fn scalar_schema() -> Schema<Scalars> {
    Schema::new()
        .field(Field::text("NAME", |s: &mut Scalars| &mut s.name))
        .field(Field::number("COUNT", |s: &mut Scalars| &mut s.count))
}

fn scalar_args(name: Value, count: Value) -> ArgMap {
    ArgMap::from([("NAME".to_string(), name), ("COUNT".to_string(), count)])
}

#[test]
fn test_empty_lists_leave_scalars_unchanged() {
    let mut scalars = Scalars {
        name: "keep".to_string(),
        count: 8,
    };
    let empty = Value::List(Vec::new());
    bind(&scalar_schema(), &mut scalars, &scalar_args(empty.clone(), empty)).unwrap();
    assert_eq!(scalars.name, "keep");
    assert_eq!(scalars.count, 8);
}

#[test]
fn test_single_item_lists_bind_scalars() {
    let mut scalars = Scalars::default();
    bind(
        &scalar_schema(),
        &mut scalars,
        &scalar_args(Value::from(vec!["x"]), Value::from(vec!["12"])),
    )
    .unwrap();
    assert_eq!(scalars.name, "x");
    assert_eq!(scalars.count, 12);
}

#[test]
fn test_long_lists_fail_scalars() {
    let mut scalars = Scalars::default();
    let err = bind(
        &scalar_schema(),
        &mut scalars,
        &scalar_args(Value::from(vec!["a", "b"]), Value::from("1")),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "NAME: too many values");
    assert_eq!(scalars.name, "");
    assert_eq!(scalars.count, 0);
}

// ---------------------------------------------------------------------------
// Self-merging fields
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Counting {
    calls: usize,
    last: Option<Value>,
}

impl MergeValue for Counting {
    fn merge_value(&mut self, value: &Value) -> Result<(), MergeError> {
        self.calls += 1;
        self.last = Some(value.clone());
        Ok(())
    }
}

#[test]
fn test_merge_field_called_once_per_bind() {
    #[derive(Default)]
    struct Opts {
        tally: Counting,
        alias: Counting,
    }

    let schema = Schema::new()
        .field(Field::merge("TALLY", |o: &mut Opts| &mut o.tally))
        .field(Field::merge("alias", |o: &mut Opts| &mut o.alias).key("TALLY"));
    let args = ArgMap::from([("TALLY".to_string(), Value::from(vec!["a"]))]);

    let mut opts = Opts::default();
    bind(&schema, &mut opts, &args).unwrap();

    assert_eq!(opts.tally.calls, 1);
    assert_eq!(opts.tally.last, Some(Value::from(vec!["a"])));
    assert_eq!(opts.alias.calls, 1, "colliding keys bind both fields");
}
