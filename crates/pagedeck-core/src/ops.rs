//! Page mutations: rotate, delete, move
//!
//! Each operation parses the document, performs a single page-tree edit,
//! and serializes the result. Deleting prunes orphaned objects; moving
//! flattens the page tree under the root Pages node.

use lopdf::{Document, Object, ObjectId};

use crate::error::PagedeckError;
use crate::inspect::{effective_rotation, inherited_attribute};

/// Attributes a page may inherit from ancestor Pages nodes. These are
/// pushed down onto each page before the tree is flattened so nothing is
/// lost when intermediate nodes get pruned.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Rotate a page clockwise by 90 degrees.
///
/// The new value is the page's effective (possibly inherited) rotation
/// plus 90, normalized into 0..360 and stored on the page object itself.
pub fn rotate_page(bytes: &[u8], page: u32) -> Result<Vec<u8>, PagedeckError> {
    let mut doc = crate::load_document(bytes)?;
    let page_id = lookup_page(&doc, page)?;

    let rotation = effective_rotation(&doc, page_id)?;
    let rotated = (rotation + 90).rem_euclid(360);

    dict_mut(&mut doc, page_id)?.set("Rotate", Object::Integer(rotated));

    save(&mut doc)
}

/// Delete a page, keeping the remaining pages in their relative order.
///
/// Deleting the last remaining page is rejected: an empty PDF has no valid
/// page tree and nothing left to edit.
pub fn delete_page(bytes: &[u8], page: u32) -> Result<Vec<u8>, PagedeckError> {
    let mut doc = crate::load_document(bytes)?;
    let page_count = doc.get_pages().len() as u32;

    if page == 0 || page > page_count {
        return Err(PagedeckError::PageOutOfRange { page, page_count });
    }
    if page_count == 1 {
        return Err(PagedeckError::LastPage);
    }

    doc.delete_pages(&[page]);

    // Remove orphaned objects left behind by the deleted page
    doc.prune_objects();
    doc.compress();

    save(&mut doc)
}

/// Move a page from one position to another (pop-and-insert semantics:
/// the page at `from` is removed and reinserted at `to`).
pub fn move_page(bytes: &[u8], from: u32, to: u32) -> Result<Vec<u8>, PagedeckError> {
    let mut doc = crate::load_document(bytes)?;
    let page_count = doc.get_pages().len() as u32;

    for page in [from, to] {
        if page == 0 || page > page_count {
            return Err(PagedeckError::PageOutOfRange { page, page_count });
        }
    }
    if from == to {
        return Err(PagedeckError::NoOpMove);
    }

    let mut order: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let page_id = order.remove((from - 1) as usize);
    order.insert((to - 1) as usize, page_id);

    rebuild_page_tree(&mut doc, &order)?;

    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();

    save(&mut doc)
}

/// Rewrite the document so the root Pages node directly parents `order`.
/// Intermediate Pages nodes become orphans and are pruned by the caller.
fn rebuild_page_tree(doc: &mut Document, order: &[ObjectId]) -> Result<(), PagedeckError> {
    let root_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| PagedeckError::OperationError(e.to_string()))?;

    for &page_id in order {
        // Collect inherited attributes first; the mutable borrow below
        // cannot overlap the ancestor walk.
        let mut pushed_down = Vec::new();
        for key in INHERITABLE_KEYS {
            let dict = doc
                .get_dictionary(page_id)
                .map_err(|e| PagedeckError::OperationError(e.to_string()))?;
            if dict.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(doc, page_id, key)? {
                pushed_down.push((key, value));
            }
        }

        let dict = dict_mut(doc, page_id)?;
        for (key, value) in pushed_down {
            dict.set(key, value);
        }
        dict.set("Parent", Object::Reference(root_id));
    }

    let root = dict_mut(doc, root_id)?;
    root.set("Count", Object::Integer(order.len() as i64));
    root.set(
        "Kids",
        order
            .iter()
            .map(|page_id| Object::Reference(*page_id))
            .collect::<Vec<_>>(),
    );

    Ok(())
}

fn lookup_page(doc: &Document, page: u32) -> Result<ObjectId, PagedeckError> {
    let pages = doc.get_pages();
    pages
        .get(&page)
        .copied()
        .ok_or(PagedeckError::PageOutOfRange {
            page,
            page_count: pages.len() as u32,
        })
}

fn dict_mut(
    doc: &mut Document,
    id: ObjectId,
) -> Result<&mut lopdf::Dictionary, PagedeckError> {
    doc.get_object_mut(id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PagedeckError::OperationError(e.to_string()))
}

fn save(doc: &mut Document) -> Result<Vec<u8>, PagedeckError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PagedeckError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}
