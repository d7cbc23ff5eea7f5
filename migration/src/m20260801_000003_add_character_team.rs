use sea_orm_migration::{prelude::*, schema::*};

use crate::MigrationStep;

/// 为 characters 表追加可空的 team 列。
///
/// 新库在建表阶段已带有该列；先探测再追加，列已存在时静默跳过。
pub struct Migration;

#[async_trait::async_trait]
impl MigrationStep for Migration {
    fn version(&self) -> &'static str {
        "v2_add_team_field"
    }

    async fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        if manager.has_column("characters", "team").await? {
            return Ok(());
        }

        manager
            .alter_table(
                Table::alter()
                    .table(Characters::Table)
                    .add_column(string_null(Characters::Team))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Characters {
    Table,
    Team,
}
