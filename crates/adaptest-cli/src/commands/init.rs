//! The `adaptest init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create adaptest.toml
    if std::path::Path::new("adaptest.toml").exists() {
        println!("adaptest.toml already exists, skipping.");
    } else {
        std::fs::write("adaptest.toml", SAMPLE_CONFIG)?;
        println!("Created adaptest.toml");
    }

    // Create example item bank
    std::fs::create_dir_all("item-banks")?;
    let example_path = std::path::Path::new("item-banks/example.toml");
    if example_path.exists() {
        println!("item-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created item-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit adaptest.toml to tune the stopping rule and baseline");
    println!("  2. Run: adaptest validate --bank item-banks/example.toml");
    println!("  3. Run: adaptest simulate --bank item-banks/example.toml --abilities=-1.5,0,2");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptest configuration

parallelism = 4

[estimator]
max_iterations = 10
tolerance = 0.001
theta_bound = 5.0
min_information = 1e-6
confidence_z = 1.96
interval_points_per_logit = 6.25

[stopping]
min_questions = 3
max_confidence_interval = 10.0
# max_questions = 30

[reporting]
baseline_questions = 15
minutes_per_question = 2
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Item Bank"
description = "A small calibrated bank to get started"

[[items]]
id = "ex-01"
prompt = "What is 7 + 5?"
difficulty = 10
topic = "arithmetic"

[[items]]
id = "ex-02"
prompt = "What is 12 x 12?"
difficulty = 25
topic = "arithmetic"

[[items]]
id = "ex-03"
prompt = "Solve for x: 3x + 4 = 19"
difficulty = 40
topic = "algebra"

[[items]]
id = "ex-04"
prompt = "Factor x^2 - 5x + 6"
difficulty = 50
topic = "algebra"

[[items]]
id = "ex-05"
prompt = "What is the derivative of sin(x) * x?"
difficulty = 65
topic = "calculus"

[[items]]
id = "ex-06"
prompt = "Evaluate the integral of 1 / (1 + x^2) from 0 to 1"
difficulty = 80
topic = "calculus"

[[items]]
id = "ex-07"
prompt = "Prove that the square root of 2 is irrational"
difficulty = 90
topic = "proof"
"#;
