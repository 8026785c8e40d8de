use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub test_paper_id: i32,
    pub final_score: f64,
    /// Question id to chosen option index.
    pub user_answers: Option<Json>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::test_paper::Entity",
        from = "Column::TestPaperId",
        to = "super::test_paper::Column::Id",
        on_delete = "Cascade"
    )]
    TestPaper,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::test_paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestPaper.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
