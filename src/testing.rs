use crate::prelude::*;
use serde_json::{json, Value};

#[macro_export]
macro_rules! assert_out {
    ($expected:literal, $actual:expr) => {
        $crate::testing::assert_out(
            indoc::indoc!($expected).trim(),
            String::from_utf8_lossy(&$actual).trim(),
        );
    };
}

#[track_caller]
pub fn assert_out(expected: impl AsRef<str>, actual: impl AsRef<str>) {
    pa::assert_str_eq!(expected.as_ref(), actual.as_ref());
}

/// Builds a driver on top of given fake transport, with colors disabled so
/// that the output can be compared verbatim.
pub fn driver(transport: LxdFakeTransport) -> LxdDriver {
    colored::control::set_override(false);

    LxdDriver::builder(LxdDriverOptions::default())
        .build_with(|_| Ok(Box::new(transport)))
        .unwrap()
}

pub fn container_payload(name: &str, status: &str) -> Value {
    json!({
        "type": "sync",
        "status": "Success",
        "metadata": {
            "name": name,
            "architecture": "x86_64",
            "config": {},
            "created_at": "2024-01-02T03:04:05Z",
            "status": status,
        },
    })
}

pub fn success() -> Value {
    json!({ "type": "sync", "status": "Success", "metadata": {} })
}
