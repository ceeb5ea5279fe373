//! Shared fixtures for the decode benchmarks.

use serde::Deserialize;

/// A flat record of scalars.
pub const FLAT_DOC: &str = r#"(point (x 10) (y -20) (label "origin") (visible true))"#;

/// Nested records and sequences.
pub const NESTED_DOC: &str = r#"
(service
  (name "gateway")
  (replicas 3)
  (ports 80 0x1BB 0o10000)
  (limits (cpu 0.5) (memory 0x40000000))
  (env
    (var (key "RUST_LOG") (value "info"))
    (var (key "GREETING") (value "héllo\tworld"))))
"#;

#[derive(Debug, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub label: String,
    pub visible: bool,
}

#[derive(Debug, Deserialize)]
pub struct Service {
    pub name: String,
    pub replicas: u8,
    pub ports: Vec<u16>,
    pub limits: Limits,
    pub env: Vec<Var>,
}

#[derive(Debug, Deserialize)]
pub struct Limits {
    pub cpu: f32,
    pub memory: u64,
}

#[derive(Debug, Deserialize)]
pub struct Var {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct Samples {
    pub values: Vec<i64>,
}

/// A long integer sequence, `(samples (values 0 1 2 ...))`.
pub fn wide_doc(len: usize) -> String {
    let mut doc = String::from("(samples (values");
    for i in 0..len {
        doc.push(' ');
        doc.push_str(&i.to_string());
    }
    doc.push_str("))");
    doc
}
