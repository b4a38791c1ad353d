// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! C3 linearization of model hierarchies.
//!
//! ```text
//!        A            mro(D) = [B, C, A, object]
//!       / \
//!      B   C
//!       \ /
//!        D
//! ```

use crate::{error::DefinitionError, model::Ancestor};

/// Resolution order of a class with direct `bases`, excluding the class.
///
/// Always ends with [`Ancestor::Object`].
///
/// # Errors
///
/// [`DefinitionError::InconsistentHierarchy`] when no order preserves both
/// the local base order and every base's own resolution order.
pub fn linearize(model: &str, bases: &[Ancestor]) -> Result<Vec<Ancestor>, DefinitionError> {
    if bases.is_empty() {
        return Ok(vec![Ancestor::Object]);
    }

    let mut sequences: Vec<Vec<Ancestor>> = bases.iter().map(Ancestor::linearization).collect();
    sequences.push(bases.to_vec());

    let mut order = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(order);
        }

        let head = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|candidate| !sequences.iter().any(|seq| seq[1..].contains(candidate)))
            .cloned()
            .ok_or_else(|| DefinitionError::InconsistentHierarchy {
                model: model.to_string()
            })?;

        for seq in &mut sequences {
            if seq[0] == head {
                seq.remove(0);
            }
        }
        order.push(head);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{model::PlainClass, signature::Signature};

    fn plain(name: &str) -> Ancestor {
        Ancestor::Plain(Arc::new(PlainClass::new(name, Signature::new())))
    }

    fn names(order: &[Ancestor]) -> Vec<&str> {
        order.iter().map(Ancestor::name).collect()
    }

    #[test]
    fn no_bases_is_object() {
        let order = linearize("A", &[]).expect("order");
        assert_eq!(names(&order), ["object"]);
    }

    #[test]
    fn plain_bases_keep_declaration_order() {
        let order = linearize("C", &[plain("P"), plain("Q")]).expect("order");
        assert_eq!(names(&order), ["P", "Q", "object"]);
    }

    #[test]
    fn repeated_base_is_inconsistent() {
        let p = plain("P");
        let err = linearize("C", &[p.clone(), p]).expect_err("duplicate base");
        assert!(matches!(err, DefinitionError::InconsistentHierarchy { .. }));
    }
}
