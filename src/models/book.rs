use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::audience::Audience;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub publish_date: String, // YYYY-MM-DD
    pub author_id: i32,
    pub audience: Audience,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_genres::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_genres::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
