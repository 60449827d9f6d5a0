//! Page-level PDF operations for the pagedeck editor
//!
//! All operations work on byte buffers: parse with lopdf, mutate the page
//! tree, serialize back. Page numbers are 1-based throughout, matching
//! `lopdf::Document::get_pages()`.

pub mod error;
pub mod inspect;
pub mod ops;

pub use error::PagedeckError;
pub use inspect::{inspect, PageInfo};
pub use ops::{delete_page, move_page, rotate_page};

use lopdf::Document;

/// Parse PDF bytes, rejecting encrypted documents up front.
pub(crate) fn load_document(bytes: &[u8]) -> Result<Document, PagedeckError> {
    let doc = Document::load_mem(bytes).map_err(|e| PagedeckError::ParseError(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(PagedeckError::Encrypted);
    }
    Ok(doc)
}

/// Parse PDF bytes and return page count
pub fn page_count(bytes: &[u8]) -> Result<u32, PagedeckError> {
    let doc = load_document(bytes)?;
    Ok(doc.get_pages().len() as u32)
}

#[cfg(test)]
pub(crate) mod testdoc {
    use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

    /// Build an n-page PDF where page i has MediaBox height 700 + i, so
    /// page identity survives save/reload and order can be asserted on.
    pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();

        for i in 0..num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                    ),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(600)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("Page {}", i + 1).into_bytes(),
                            lopdf::StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(700 + i as i64 + 1),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
            ]);
            let page_id = doc.add_object(page);
            page_ids.push(page_id);
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// Two pages under an intermediate Pages node that carries /Rotate 90
    /// and the MediaBox; the pages themselves declare neither.
    pub fn create_nested_test_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let root_id = doc.new_object_id();
        let mid_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for _ in 0..2 {
            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(mid_id)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let mid = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_id)),
            ("Count", Object::Integer(2)),
            ("Rotate", Object::Integer(90)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(mid_id, Object::Dictionary(mid));

        let root = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(2)),
            ("Kids", Object::Array(vec![Object::Reference(mid_id)])),
        ]);
        doc.objects.insert(root_id, Object::Dictionary(root));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(root_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// MediaBox heights in page order; a stable fingerprint of which page
    /// sits where.
    pub fn page_heights(bytes: &[u8]) -> Vec<i64> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .into_values()
            .map(|page_id| {
                let media_box = crate::inspect::inherited_attribute(&doc, page_id, b"MediaBox")
                    .unwrap()
                    .expect("page has no MediaBox");
                match &media_box.as_array().unwrap()[3] {
                    Object::Integer(i) => *i,
                    Object::Real(r) => *r as i64,
                    other => panic!("unexpected MediaBox entry: {:?}", other),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_count() {
        let pdf = testdoc::create_test_pdf(5);
        assert_eq!(page_count(&pdf).unwrap(), 5);
    }

    #[test]
    fn test_page_count_nested_tree() {
        let pdf = testdoc::create_nested_test_pdf();
        assert_eq!(page_count(&pdf).unwrap(), 2);
    }

    #[test]
    fn test_garbage_input_fails() {
        let result = page_count(b"not a pdf");
        assert!(matches!(result, Err(PagedeckError::ParseError(_))));
    }
}
