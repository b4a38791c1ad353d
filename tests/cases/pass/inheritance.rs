// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use autoschema::{BoxError, Instance, Kwargs, Many, Model, One, autoschema, json};

fn stamp(instance: &mut Instance, _: &Kwargs) -> Result<(), BoxError> {
    instance.set("stamped", true);
    Ok(())
}

#[derive(Model)]
#[model(init = "stamp")]
pub struct Document {
    id: i64
}

#[derive(Model)]
pub struct Author {
    name: String
}

#[derive(Model)]
#[model(name = "Page", extends(Document))]
pub struct PageStub {
    author: One<Author>,
    editors: Many<Author>
}

fn main() {
    autoschema().register_model::<Document>().unwrap();
    autoschema().register_model::<Author>().unwrap();
    let page = autoschema().register_model::<PageStub>().unwrap();
    assert_eq!(page.schema().name(), "PageSchema");
    assert_eq!(page.schema().base_names(), ["DocumentSchema", "FactorySchema"]);

    let wire = json!({"id": 7, "author": {"name": "Ada"}, "editors": []});
    let p = page.load(&wire).unwrap();
    assert!(p.has("stamped"));
    assert_eq!(p.dump().unwrap(), wire);
}
