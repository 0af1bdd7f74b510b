#![allow(dead_code)]

use json_coerce::{Type, TypeBuilder, Value};

pub fn json(v: serde_json::Value) -> Value {
    Value::from(v)
}

pub fn to_serde(v: &Value) -> serde_json::Value {
    serde_json::Value::try_from(v).expect("value has a json form")
}

/// `Person { name: string, age: int, email: string?, tags: string[] }`
pub fn person_type() -> Type {
    let t = TypeBuilder::new();
    t.structure("Person")
        .field("name", t.string())
        .field("age", t.int())
        .field("email", t.optional(t.string()))
        .field("tags", t.array(t.string()))
        .build()
}

pub fn nested(depth: usize) -> serde_json::Value {
    (0..depth).fold(serde_json::json!(1), |inner, _| serde_json::json!([inner]))
}
