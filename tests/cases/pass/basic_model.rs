// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use autoschema::{Model, autoschema, json, kwargs};

#[derive(Model)]
pub struct Point {
    x: i64,
    y: i64
}

fn main() {
    let point = autoschema().register_model::<Point>().unwrap();
    assert_eq!(point.schema().name(), "PointSchema");

    let p = point.construct(kwargs! { "x" => 1, "y" => 2 }).unwrap();
    assert_eq!(p.dump().unwrap(), json!({"x": 1, "y": 2}));
}
