//! Relationship engine (spec.md §4.E).
//!
//! Pure functions over an immutable [`Schema`]: no caching, no memoization,
//! nothing computed ahead of time. Each call walks `schema.models` once.
//! Deterministic in schema declaration order, per spec.md §4.E.

use crate::error::SchemaError;
use crate::semantic::{Model, ModelId, Schema};

/// Every model whose path template has exactly one collection part.
pub fn root_models(schema: &Schema) -> Vec<ModelId> {
    schema
        .models
        .iter()
        .enumerate()
        .filter(|(_, m)| m.path.parts.len() == 1)
        .map(|(i, _)| ModelId(i))
        .collect()
}

/// The unique model whose last collection part names `m`'s second-to-last
/// collection part. `None` for root models; a [`SchemaError`] if `m` is
/// non-root but no such parent model is declared.
pub fn parent_model(schema: &Schema, m: ModelId) -> Result<Option<ModelId>, SchemaError> {
    let model = schema.model(m);
    if model.path.parts.len() < 2 {
        return Ok(None);
    }
    let parent_collection = &model.path.parts[model.path.parts.len() - 2].collection_name;
    schema
        .models
        .iter()
        .enumerate()
        .find(|(_, candidate)| {
            candidate
                .path
                .parts
                .last()
                .map(|p| &p.collection_name == parent_collection)
                .unwrap_or(false)
        })
        .map(|(i, _)| Some(ModelId(i)))
        .ok_or_else(|| SchemaError::MissingParentCollection {
            model: model.name.clone(),
            template: model.path.pattern.clone(),
        })
}

/// Every model `c` whose path is exactly one collection part longer than
/// `m`'s and whose leading parts match `m`'s parts by collection name.
pub fn direct_subcollections_of_model(schema: &Schema, m: ModelId) -> Vec<ModelId> {
    let model = schema.model(m);
    let prefix_len = model.path.parts.len();
    schema
        .models
        .iter()
        .enumerate()
        .filter(|(_, candidate)| {
            candidate.path.parts.len() == prefix_len + 1
                && candidate.path.parts[..prefix_len]
                    .iter()
                    .zip(&model.path.parts)
                    .all(|(a, b)| a.collection_name == b.collection_name)
        })
        .map(|(i, _)| ModelId(i))
        .collect()
}

/// Convenience accessor mirroring the others' shape; not part of the named
/// relationship-engine trio but useful to generators (spec.md §4.H item 5).
pub fn model_by_id<'a>(schema: &'a Schema, id: ModelId) -> &'a Model {
    schema.model(id)
}
