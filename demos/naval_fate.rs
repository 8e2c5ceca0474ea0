//! Binds a hand-written parse result for the classic naval_fate usage:
//!
//! ```text
//! Usage:
//!   naval_fate ship new <name>...
//!   naval_fate ship <name> move <x> <y> [--speed=<kn>]
//!   naval_fate -h | --help
//! ```
//!
//! Run with:
//! ```sh
//! cargo run -p docopt-merge-demos --example naval_fate
//! ```

use docopt_merge_core::{ArgMap, Field, Schema, bind};

#[derive(Debug, Default)]
struct NavalFate {
    ship: bool,
    new: bool,
    movement: bool,
    names: Vec<String>,
    x: f64,
    y: f64,
    speed: u32,
    help: bool,
    history: Vec<String>,
}

fn schema() -> Schema<NavalFate> {
    Schema::new()
        .field(Field::boolean("ship", |n: &mut NavalFate| &mut n.ship).key("ship"))
        .field(Field::boolean("new", |n: &mut NavalFate| &mut n.new).key("new"))
        .field(Field::boolean("movement", |n: &mut NavalFate| &mut n.movement).key("move"))
        .field(Field::text_list("names", |n: &mut NavalFate| &mut n.names).key("<name>"))
        .field(Field::number("x", |n: &mut NavalFate| &mut n.x).key("<x>"))
        .field(Field::number("y", |n: &mut NavalFate| &mut n.y).key("<y>"))
        .field(Field::number("speed", |n: &mut NavalFate| &mut n.speed).key("--speed"))
        .field(Field::boolean("help", |n: &mut NavalFate| &mut n.help).key("--help"))
        .field(Field::text_list("history", |n: &mut NavalFate| &mut n.history).private())
}

fn main() {
    // naval_fate ship Guardian move 10 -2.5e1 --speed=20
    let args: ArgMap = match serde_json::from_str(
        r#"{
            "ship": true,
            "new": false,
            "move": true,
            "<name>": ["Guardian"],
            "<x>": "10",
            "<y>": "-2.5e1",
            "--speed": "20",
            "--help": false
        }"#,
    ) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("invalid parse result: {err}");
            std::process::exit(1);
        }
    };

    let mut opts = NavalFate {
        speed: 10,
        ..NavalFate::default()
    };
    if let Err(err) = bind(&schema(), &mut opts, &args) {
        eprintln!("error: {err}");
        std::process::exit(if err.is_fatal() { 70 } else { 64 });
    }

    println!("{opts:#?}");
}
