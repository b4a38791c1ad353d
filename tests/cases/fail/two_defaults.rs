// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use autoschema::Model;

#[derive(Model)]
pub struct Counter {
    #[model(default = 1, default_expr = "2")]
    count: i64
}

fn main() {
    let counter = Counter { count: 1 };
    assert_eq!(counter.count, 1);
}
