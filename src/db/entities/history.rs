//! DB storage for generated dialogues and memes
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "history")]
/// One saved generation
pub struct Model {
    #[sea_orm(primary_key)]
    /// db id
    pub id: i32,
    /// `dialogue` or `meme`
    pub kind: String,
    /// what the user typed
    pub description: String,
    /// JSON of the generated result
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    /// when it was saved (UTC)
    pub created_at: DateTime,
}

/// history has no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
