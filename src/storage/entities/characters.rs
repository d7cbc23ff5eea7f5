use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "characters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// NULL 表示公共（共享）角色
    pub user_id: Option<i32>,
    pub name: String,
    pub title: Option<String>,
    pub age: Option<String>,
    pub occupation: Option<String>,
    pub team: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    /// JSON array 字符串
    pub abilities: Option<String>,
    /// JSON array 字符串
    pub relationships: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
