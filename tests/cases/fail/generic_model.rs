// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use autoschema::Model;

#[derive(Model)]
pub struct Wrapper<T> {
    inner: Vec<T>
}

fn main() {
    let wrapper = Wrapper::<i64> { inner: Vec::new() };
    assert!(wrapper.inner.is_empty());
}
