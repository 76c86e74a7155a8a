//! Page-level PDF merging with lopdf.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{DocumentMerger, load_document};
use crate::error::MergeError;

/// Page attributes a page may inherit from its page tree ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Merges PDFs by concatenating their pages under a single page tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfMerger;

impl LopdfMerger {
    pub fn new() -> Self {
        Self
    }

    fn merge_documents(&self, documents: Vec<Document>) -> Result<Document, MergeError> {
        let mut max_id = 1;
        let mut page_order: Vec<ObjectId> = Vec::new();
        let mut pages: BTreeMap<ObjectId, Dictionary> = BTreeMap::new();
        let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

        for mut doc in documents {
            doc.renumber_objects_with(max_id);
            max_id = doc.max_id + 1;

            for page_id in doc.get_pages().into_values() {
                let page = flattened_page(&doc, page_id)?;
                page_order.push(page_id);
                pages.insert(page_id, page);
            }
            objects.extend(doc.objects);
        }

        let mut merged = Document::with_version("1.5");
        let mut catalog: Option<(ObjectId, Dictionary)> = None;
        let mut page_tree: Option<(ObjectId, Dictionary)> = None;

        for (id, object) in objects {
            let type_name = object.type_name().map(|n| n.to_vec()).unwrap_or_default();
            match type_name.as_slice() {
                b"Catalog" => {
                    if catalog.is_none() {
                        catalog = Some((id, as_dictionary(&object)?));
                    }
                }
                b"Pages" => {
                    if page_tree.is_none() {
                        page_tree = Some((id, as_dictionary(&object)?));
                    }
                }
                // Pages are re-inserted below; outlines point into the old trees
                b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    merged.objects.insert(id, object);
                }
            }
        }

        let (catalog_id, mut catalog) =
            catalog.ok_or_else(|| MergeError::Structure("no catalog found".to_string()))?;
        let (tree_id, mut tree) =
            page_tree.ok_or_else(|| MergeError::Structure("no page tree found".to_string()))?;

        for id in &page_order {
            if let Some(mut page) = pages.remove(id) {
                page.set("Parent", tree_id);
                merged.objects.insert(*id, Object::Dictionary(page));
            }
        }

        tree.set("Count", page_order.len() as i64);
        tree.set(
            "Kids",
            page_order.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        );
        for key in INHERITABLE {
            tree.remove(key);
        }
        tree.remove(b"Parent");
        merged.objects.insert(tree_id, Object::Dictionary(tree));

        catalog.set("Pages", tree_id);
        catalog.remove(b"Outlines");
        merged.objects.insert(catalog_id, Object::Dictionary(catalog));

        merged.trailer.set("Root", catalog_id);
        merged.max_id = merged.objects.keys().map(|(num, _)| *num).max().unwrap_or(0);
        merged.renumber_objects();
        merged.adjust_zero_pages();

        debug!("Merged {} pages", page_order.len());
        Ok(merged)
    }
}

impl DocumentMerger for LopdfMerger {
    fn merge(&self, documents: &[(&str, &[u8])]) -> Result<Vec<u8>, MergeError> {
        if documents.is_empty() {
            return Err(MergeError::Empty);
        }

        let mut loaded = Vec::with_capacity(documents.len());
        for (filename, data) in documents {
            let (doc, _) = load_document(data).map_err(|e| MergeError::Load {
                filename: filename.to_string(),
                reason: e.to_string(),
            })?;
            trace!("Loaded {} for merge", filename);
            loaded.push(doc);
        }

        let mut merged = self.merge_documents(loaded)?;
        let mut buffer = Vec::new();
        merged
            .save_to(&mut buffer)
            .map_err(|e| MergeError::Save(e.to_string()))?;
        Ok(buffer)
    }
}

fn as_dictionary(object: &Object) -> Result<Dictionary, MergeError> {
    object
        .as_dict()
        .cloned()
        .map_err(|e| MergeError::Structure(e.to_string()))
}

/// The page dictionary with inherited attributes copied onto it, since its
/// original ancestors do not survive the merge.
fn flattened_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, MergeError> {
    let mut page = doc
        .get_dictionary(page_id)
        .cloned()
        .map_err(|e| MergeError::Structure(e.to_string()))?;

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    while let Some(parent_id) = parent {
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(page)
}
