// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use autoschema::{Kwargs, Model, Raw, autoschema, json};
use chrono::NaiveDateTime;

fn default_tags() -> Vec<String> {
    vec!["draft".to_string()]
}

#[derive(Model)]
pub struct Post {
    /// Post title.
    title: String,

    #[model(default = 0)]
    views: i64,

    #[model(default_expr = "\"anonymous\"")]
    author: String,

    #[model(default_with = "default_tags")]
    tags: Vec<String>,

    #[model(rename = "publishedAt")]
    published_at: Option<NaiveDateTime>,

    metadata: Option<Raw>,

    #[model(positional, default = false)]
    pinned: bool
}

fn main() {
    let post = autoschema().register_model::<Post>().unwrap();
    let title = post.schema().field("title").unwrap();
    assert_eq!(title.options().description.as_deref(), Some("Post title."));
    assert!(post.schema().field("pinned").is_none());

    let mut args = Kwargs::new();
    args.insert("title".to_string(), "Hello".into());
    let p = post.construct(args).unwrap();
    assert_eq!(
        p.dump().unwrap(),
        json!({
            "title": "Hello",
            "views": 0,
            "author": "anonymous",
            "tags": ["draft"],
            "publishedAt": null,
            "metadata": {}
        })
    );
}
