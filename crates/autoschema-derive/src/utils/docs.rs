// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Documentation extraction utilities.
//!
//! Doc comments on model fields become parameter documentation, which the
//! generated schema carries as the field description.
//!
//! ```rust,ignore
//! #[derive(Model)]
//! pub struct Point {
//!     /// Horizontal offset.
//!     x: i64
//! }
//!
//! // Parameter::keyword_only("x", ..).with_doc("Horizontal offset.")
//! ```

use syn::Attribute;

/// Combine all `#[doc = "..."]` attributes into one trimmed string.
///
/// Returns `None` when there are no doc comments or they are blank.
pub fn extract_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let doc_lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| {
            if let syn::Meta::NameValue(meta) = &attr.meta
                && let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit_str),
                    ..
                }) = &meta.value
            {
                return Some(lit_str.value());
            }
            None
        })
        .collect();

    let combined = doc_lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = combined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_attrs(input: &str) -> Vec<Attribute> {
        let item: syn::ItemStruct = syn::parse_str(input).unwrap();
        item.fields.into_iter().next().unwrap().attrs
    }

    #[test]
    fn field_doc_lines_are_joined() {
        let attrs = field_attrs(
            r#"
            struct Point {
                /// Horizontal offset.
                /// In pixels.
                x: i64
            }
        "#
        );
        assert_eq!(
            extract_doc_comments(&attrs),
            Some("Horizontal offset.\nIn pixels.".to_string())
        );
    }

    #[test]
    fn blank_doc_is_none() {
        let attrs = field_attrs(
            r#"
            struct Point {
                ///
                x: i64
            }
        "#
        );
        assert_eq!(extract_doc_comments(&attrs), None);
    }

    #[test]
    fn undocumented_field_is_none() {
        let attrs = field_attrs(
            r#"
            struct Point {
                #[model(rename = "X")]
                x: i64
            }
        "#
        );
        assert_eq!(extract_doc_comments(&attrs), None);
    }
}
