use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub max_score: f64,
    /// JSON array of option texts; legacy rows hold the array encoded as a JSON string.
    pub options: Json,
    pub correct_option_index: i32,
    pub test_paper_id: i32,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_paper::Entity",
        from = "Column::TestPaperId",
        to = "super::test_paper::Column::Id",
        on_delete = "Cascade"
    )]
    TestPaper,
}

impl Related<super::test_paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestPaper.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
