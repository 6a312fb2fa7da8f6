use clap::Parser;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::BlinkError,
    storage::{counter_value, Cache},
};

/// Run a sequence of store operations within a single process run.
///
/// Operations: `put <key> <value>`, `get <key>`, `forget <key>`,
/// `incr <key>`, `decr <key>`, `keys`, `flush`. Values are parsed as JSON and
/// fall back to plain strings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Value reported for reads that miss (JSON)
    #[clap(short, long, default_value_t = ("null").to_string())]
    pub default: String,

    #[clap(long, default_value_t = ("warn").to_string())]
    pub log_level: String,

    #[arg(allow_negative_numbers = true)]
    pub ops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Put(String, Value),
    Get(String),
    Forget(String),
    Incr(String),
    Decr(String),
    Keys,
    Flush,
}

/// Parses a raw argument as JSON, keeping it as a string when it is not.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn next_arg<I>(tokens: &mut I, op: &str, arg: &'static str) -> Result<String, BlinkError>
where
    I: Iterator<Item = String>,
{
    tokens.next().ok_or_else(|| BlinkError::MissingArgument {
        op: op.to_owned(),
        arg,
    })
}

pub fn parse_ops<I, S>(tokens: I) -> Result<Vec<Op>, BlinkError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = tokens.into_iter().map(Into::into);
    let mut ops = Vec::new();

    while let Some(op) = tokens.next() {
        let parsed = match op.as_str() {
            "put" => {
                let key = next_arg(&mut tokens, &op, "key")?;
                let raw = next_arg(&mut tokens, &op, "value")?;
                Op::Put(key, parse_value(&raw))
            }
            "get" => Op::Get(next_arg(&mut tokens, &op, "key")?),
            "forget" => Op::Forget(next_arg(&mut tokens, &op, "key")?),
            "incr" => Op::Incr(next_arg(&mut tokens, &op, "key")?),
            "decr" => Op::Decr(next_arg(&mut tokens, &op, "key")?),
            "keys" => Op::Keys,
            "flush" => Op::Flush,
            _ => return Err(BlinkError::UnknownOperation(op)),
        };
        ops.push(parsed);
    }

    Ok(ops)
}

/// Applies operations to an injected cache, reporting misses as `fallback`.
#[derive(Debug)]
pub struct Session<C> {
    cache: C,
    fallback: Value,
}

impl<C: Cache<Value>> Session<C> {
    pub fn new(cache: C, fallback: Value) -> Self {
        Self { cache, fallback }
    }

    pub fn apply(&self, op: Op) -> Value {
        debug!(?op, "applying");
        match op {
            Op::Put(key, value) => {
                self.cache.write(key, value.clone());
                value
            }
            Op::Get(key) => self.cache.read_or(&key, self.fallback.clone()),
            Op::Forget(key) => self
                .cache
                .delete(&key)
                .unwrap_or_else(|| self.fallback.clone()),
            Op::Incr(key) => self.bump(key, 1),
            Op::Decr(key) => self.bump(key, -1),
            Op::Keys => {
                let mut keys = self.cache.keys();
                keys.sort();
                Value::from(keys)
            }
            Op::Flush => {
                self.cache.clear();
                Value::Null
            }
        }
    }

    pub fn run(&self, ops: Vec<Op>) -> Vec<Value> {
        ops.into_iter().map(|op| self.apply(op)).collect()
    }

    fn bump(&self, key: String, by: i64) -> Value {
        let next = counter_value(self.cache.read(&key).as_ref()).saturating_add(by);
        self.cache.write(key, Value::from(next));
        Value::from(next)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::storage::blink::Blink;

    #[rstest]
    #[case("12", json!(12))]
    #[case("true", json!(true))]
    #[case("{\"a\":1}", json!({"a": 1}))]
    #[case("\"quoted\"", json!("quoted"))]
    #[case("myValue", json!("myValue"))]
    fn values_parse_as_json_or_string(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(parse_value(raw), expected);
    }

    #[test]
    fn parses_operation_sequence() {
        let ops = parse_ops(["put", "key", "myValue", "get", "key", "keys"]).unwrap();

        assert_eq!(
            ops,
            vec![
                Op::Put("key".to_owned(), json!("myValue")),
                Op::Get("key".to_owned()),
                Op::Keys,
            ]
        );
    }

    #[test]
    fn rejects_unknown_operation() {
        let err = parse_ops(["put", "k", "v", "explode"]).unwrap_err();

        assert!(matches!(err, BlinkError::UnknownOperation(ref op) if op == "explode"));
    }

    #[test]
    fn rejects_missing_argument() {
        let err = parse_ops(["put", "k"]).unwrap_err();

        assert!(matches!(err, BlinkError::MissingArgument { arg: "value", .. }));
    }

    #[test]
    fn session_runs_against_injected_store() {
        let store = Blink::new();
        let session = Session::new(store.clone(), json!("none"));
        let ops = parse_ops([
            "put", "key", "myValue", "get", "key", "get", "other", "incr", "n", "incr", "n",
            "decr", "n", "keys", "forget", "key", "flush",
        ])
        .unwrap();

        assert_eq!(
            session.run(ops),
            vec![
                json!("myValue"),
                json!("myValue"),
                json!("none"),
                json!(1),
                json!(2),
                json!(1),
                json!(["key", "n"]),
                json!("myValue"),
                json!(null),
            ]
        );
        assert!(store.is_empty());
    }
}
