// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use shapecheck::*;

use anyhow::{bail, Result};
use num_bigint::BigInt;
use serde::Deserialize;
use test_generator::test_resources;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    schema: serde_json::Value,
    #[serde(default = "undefined")]
    value: Value,
    label: Option<String>,
    want_valid: Option<bool>,
    want_messages: Option<Vec<String>>,
    want_error: Option<String>,
    skip: Option<bool>,
}

fn undefined() -> Value {
    Value::Undefined
}

#[derive(Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

// Process test value specified in yaml to interpret special encodings.
pub fn process_value(v: &Value) -> Result<Value> {
    match v {
        // Handle Undefined encoded as a string "#undefined"
        Value::String(s) if &**s == "#undefined" => Ok(Value::Undefined),

        // Handle bigint encoded as an object
        // bigint! : "123456789012345678901234567890"
        Value::Object(fields) if fields.len() == 1 && matches!(&v["bigint!"], Value::String(_)) => {
            let digits = v["bigint!"].as_string()?;
            match digits.parse::<BigInt>() {
                Ok(n) => Ok(Value::from(n)),
                Err(e) => bail!("invalid bigint `{digits}`. {e}"),
            }
        }

        // Recursively process arrays
        Value::Array(items) => {
            let mut array_value = Value::new_array();
            let array = array_value.as_array_mut()?;
            for item in items.iter() {
                array.push(process_value(item)?);
            }
            Ok(array_value)
        }

        // Recursively process objects
        Value::Object(fields) => {
            let mut object_value = Value::new_object();
            let object = object_value.as_object_mut()?;
            for (key, value) in fields.own_entries() {
                object.insert(key.clone(), process_value(value)?);
            }
            Ok(object_value)
        }

        // Simple variants
        _ => Ok(v.clone()),
    }
}

fn run_case(case: TestCase) -> Result<()> {
    let matcher = match (Matcher::from_serde_json_value(case.schema), &case.want_error) {
        (Ok(_), Some(expected)) => bail!("schema loaded but `{expected}` was expected"),
        (Err(actual), Some(expected)) => {
            if !actual.to_string().contains(expected.as_str()) {
                bail!("`{actual}` does not contain `{expected}`");
            }
            return Ok(());
        }
        (Err(actual), None) => bail!("schema failed to load: {actual}"),
        (Ok(matcher), None) => matcher,
    };

    let value = process_value(&case.value)?;
    let want_valid = match case.want_valid {
        Some(want_valid) => want_valid,
        None => bail!("either want_valid or want_error must be specified in test case."),
    };

    let mut lines: Vec<String> = vec![];
    let valid = shapecheck::validate(&value, &matcher, case.label.as_deref(), Some(&mut lines));
    if valid != want_valid {
        bail!("want_valid = {want_valid}, got {valid}. messages = {lines:#?}");
    }

    // Rejections explain themselves whenever a label is given.
    if !valid && case.label.is_some() && lines.is_empty() {
        bail!("value rejected without a message");
    }
    if valid && !lines.is_empty() {
        bail!("value accepted with messages {lines:#?}");
    }

    if let Some(expected) = &case.want_messages {
        if &lines != expected {
            bail!("messages mismatch\nleft  = {lines:#?}\nright = {expected:#?}");
        }
    }

    // The boolean never depends on the label or the sink.
    assert_eq!(matcher.is_match(&value), valid);
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    std::eprintln!("running {file}");

    for case in test.cases {
        std::eprint!("case {} ", case.note);
        if case.skip == Some(true) {
            std::eprintln!("skipped");
            continue;
        }

        let note = case.note.clone();
        if let Err(e) = run_case(case) {
            bail!("case `{note}` failed: {e}");
        }
        std::eprintln!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{e}");
        }
    }
}

#[test_resources("tests/matcher/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
