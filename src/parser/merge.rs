//! Concatenating PDFs into a single document.
//!
//! Used to join the per-page PDFs produced by OCR into one artifact. Page
//! order follows input order; outlines of the inputs are dropped.

use std::path::Path;

use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Merge the PDFs at `inputs` and write the result to `output`.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<()> {
    let documents = inputs
        .iter()
        .map(|p| LopdfDocument::load(p.as_ref()).map_err(Error::from))
        .collect::<Result<Vec<_>>>()?;

    let mut merged = merge_documents(documents)?;
    merged.save(output)?;
    log::debug!("Merged {} PDF(s) into {}", inputs.len(), output.display());
    Ok(())
}

/// Merge in-memory documents into a new one.
pub fn merge_documents(documents: Vec<LopdfDocument>) -> Result<LopdfDocument> {
    if documents.is_empty() {
        return Err(Error::Other("no documents to merge".to_string()));
    }

    let mut merged = LopdfDocument::with_version("1.5");
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut max_id = 1;

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // Pages come back keyed by page number, so this keeps page order.
        for (_, page_id) in doc.get_pages() {
            let page = flattened_page(&doc, page_id)?;
            merged.objects.insert(page_id, Object::Dictionary(page));
            page_ids.push(page_id);
        }

        for (id, object) in doc.objects {
            match type_name(&object) {
                Some(b"Catalog" | b"Pages" | b"Page" | b"Outlines") => {}
                _ => {
                    merged.objects.insert(id, object);
                }
            }
        }
    }

    let pages_id = (max_id, 0);
    let catalog_id = (max_id + 1, 0);

    for id in &page_ids {
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(*id) {
            page.set("Parent", pages_id);
        }
    }

    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => page_ids.len() as i64,
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        }),
    );
    merged.objects.insert(
        catalog_id,
        Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }),
    );
    merged.trailer.set("Root", catalog_id);
    merged.max_id = max_id + 1;

    merged.prune_objects();
    merged.renumber_objects();
    merged.compress();

    Ok(merged)
}

/// Copy of a page dictionary with inherited attributes pulled down onto it.
fn flattened_page(doc: &LopdfDocument, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(id) = parent {
        depth += 1;
        let Ok(node) = doc.get_dictionary(id) else {
            break;
        };
        if depth > 32 {
            break;
        }
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(page)
}

fn type_name(object: &Object) -> Option<&[u8]> {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|t| t.as_name().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Stream, StringFormat};

    /// Single-page PDF whose MediaBox lives on the Pages node.
    fn single_page(label: &str, height: i64, with_outline: bool) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 100.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(label.as_bytes().to_vec(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), height.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            }),
        );
        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => pages_id };
        if with_outline {
            let outlines_id = doc.add_object(dictionary! { "Type" => "Outlines", "Count" => 0 });
            catalog.set("Outlines", outlines_id);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_merge_keeps_page_order_and_inherited_attributes() {
        let merged = merge_documents(vec![
            single_page("first", 400, true),
            single_page("second", 500, false),
            single_page("third", 600, false),
        ])
        .unwrap();

        let pages = merged.get_pages();
        assert_eq!(pages.len(), 3);

        let heights: Vec<i64> = pages
            .values()
            .map(|id| {
                let page = merged.get_dictionary(*id).unwrap();
                let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
                media_box[3].as_i64().unwrap()
            })
            .collect();
        assert_eq!(heights, vec![400, 500, 600]);

        let catalog = merged.catalog().unwrap();
        assert!(catalog.get(b"Outlines").is_err());

        let second = merged.get_page_content(pages[&2]).unwrap();
        let shown: Vec<Vec<u8>> = Content::decode(&second)
            .unwrap()
            .operations
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec![b"second".to_vec()]);
    }

    #[test]
    fn test_merge_files_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut inputs = Vec::new();
        for (i, label) in ["alpha", "beta"].iter().enumerate() {
            let path = dir.path().join(format!("page-{}.pdf", i));
            single_page(label, 400, false).save(&path).unwrap();
            inputs.push(path);
        }
        let output = dir.path().join("merged.pdf");

        merge_files(&inputs, &output).unwrap();

        let merged = LopdfDocument::load(&output).unwrap();
        assert_eq!(merged.get_pages().len(), 2);
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_documents(Vec::new()).is_err());
    }
}
