// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use autoschema::Model;

#[derive(Model)]
pub enum Status {
    Active,
    Inactive
}

fn main() {
    let all = [Status::Active, Status::Inactive];
    assert_eq!(all.len(), 2);
}
