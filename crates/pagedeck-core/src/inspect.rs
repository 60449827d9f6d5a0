//! Per-page document inspection
//!
//! The edit UI renders page-number placeholders only, so the inspection
//! surface is deliberately small: position and effective rotation per page.

use lopdf::{Document, Object, ObjectId};
use serde::Serialize;

use crate::error::PagedeckError;

/// Display info for one page of the current document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based position in the current page sequence
    pub page: u32,
    /// Effective rotation in degrees, normalized to 0/90/180/270
    pub rotation: i64,
}

/// Read per-page effective rotations, resolving /Rotate entries inherited
/// from ancestor Pages nodes.
pub fn inspect(bytes: &[u8]) -> Result<Vec<PageInfo>, PagedeckError> {
    let doc = crate::load_document(bytes)?;
    doc.get_pages()
        .into_iter()
        .map(|(page, page_id)| {
            Ok(PageInfo {
                page,
                rotation: effective_rotation(&doc, page_id)?,
            })
        })
        .collect()
}

/// Resolve the /Rotate value in effect for a page, walking the Parent chain
/// when the page itself carries none. Negative and >= 360 values are
/// normalized into 0..360.
pub(crate) fn effective_rotation(
    doc: &Document,
    page_id: ObjectId,
) -> Result<i64, PagedeckError> {
    let raw = match inherited_attribute(doc, page_id, b"Rotate")? {
        Some(Object::Integer(degrees)) => degrees,
        Some(Object::Real(degrees)) => degrees as i64,
        _ => 0,
    };
    Ok(raw.rem_euclid(360))
}

/// Find an inheritable page attribute: the page dictionary first, then each
/// ancestor Pages node. The walk is capped to guard against cyclic Parent
/// references in damaged files.
pub(crate) fn inherited_attribute(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Object>, PagedeckError> {
    const MAX_DEPTH: usize = 64;

    let mut current = page_id;
    for _ in 0..MAX_DEPTH {
        let dict = doc
            .get_dictionary(current)
            .map_err(|e| PagedeckError::OperationError(e.to_string()))?;

        if let Ok(value) = dict.get(key) {
            let value = match value {
                Object::Reference(id) => doc
                    .get_object(*id)
                    .map_err(|e| PagedeckError::OperationError(e.to_string()))?
                    .clone(),
                other => other.clone(),
            };
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return Ok(None),
        }
    }
    Ok(None)
}
