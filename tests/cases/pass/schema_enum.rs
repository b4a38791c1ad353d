// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use autoschema::{Annotation, Model, SchemaEnum, autoschema, json};

#[derive(SchemaEnum, Debug, PartialEq)]
pub enum Status {
    Draft,
    #[schema_enum(rename = "LIVE")]
    Published
}

#[derive(Model)]
pub struct Release {
    status: Status
}

fn main() {
    assert_eq!(Status::enum_type().members(), ["Draft", "LIVE"]);
    assert!(matches!(Annotation::of::<Status>(), Annotation::Enum(_)));

    let release = autoschema().register_model::<Release>().unwrap();
    let r = release.load(&json!({"status": "LIVE"})).unwrap();
    assert_eq!(r.get("status").and_then(Status::from_value), Some(Status::Published));
}
