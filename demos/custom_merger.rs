//! A user-defined field type that coerces itself.
//!
//! `Duration` accepts `30s`, `5m` or `2h` and stores seconds.
//!
//! Run with:
//! ```sh
//! cargo run -p docopt-merge-demos --example custom_merger
//! ```

use docopt_merge_core::{
    ArgMap, Base16, Field, MergeError, MergeValue, Octal, Schema, Value, bind,
};

#[derive(Debug, Default)]
struct Duration(u64);

impl MergeValue for Duration {
    fn merge_value(&mut self, value: &Value) -> Result<(), MergeError> {
        let text = value
            .as_text()
            .ok_or_else(|| format!("expected a duration, got {value}"))?;
        let Some(unit) = text.chars().last() else {
            return Err("empty duration".into());
        };
        let amount = &text[..text.len() - unit.len_utf8()];
        let scale = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            _ => return Err(format!("unknown duration unit in {text:?}").into()),
        };
        self.0 = amount.parse::<u64>()? * scale;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Opts {
    timeout: Duration,
    mode: Octal,
    key: Base16,
}

fn main() {
    let schema = Schema::new()
        .field(Field::merge("timeout", |o: &mut Opts| &mut o.timeout).key("--timeout"))
        .field(Field::merge("MODE", |o: &mut Opts| &mut o.mode))
        .field(Field::merge("key", |o: &mut Opts| &mut o.key).key("--key"));

    let mut args = ArgMap::new();
    args.insert("--timeout".into(), Value::from("5m"));
    args.insert("MODE".into(), Value::from("0644"));
    args.insert("--key".into(), Value::from("deadbeef"));

    let mut opts = Opts::default();
    match bind(&schema, &mut opts, &args) {
        Ok(()) => println!(
            "timeout={}s mode={} key={}",
            opts.timeout.0, opts.mode, opts.key
        ),
        Err(err) => eprintln!("error: {err}"),
    }

    args.insert("--timeout".into(), Value::from("5 fortnights"));
    if let Err(err) = bind(&schema, &mut Opts::default(), &args) {
        println!("rejected as expected: {err}");
    }
}
