use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

pub const EMBEDDING_DIM: i32 = 768;

/// One column per well-known metadata key plus the text payload and vector.
/// `page` and the article fields are nullable; only law chunks carry them.
pub fn build_arrow_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("source_path", DataType::Utf8, false),
        Field::new("source_rel", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("page", DataType::Int32, true),
        Field::new("book", DataType::Utf8, true),
        Field::new("article_num", DataType::Utf8, true),
        Field::new("article", DataType::Utf8, true),
        Field::new("text", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIM,
            ),
            true,
        ),
    ]))
}
