use sea_orm_migration::prelude::*;

use crate::MigrationStep;

/// 一次性数据清理：title 相同的 settings 行只保留 id 最小的一行。
///
/// 早期版本的 settings 表没有唯一约束，重复启动会插入重复的默认数据。
/// 本步骤不得重复执行（由账本保证）。
pub struct Migration;

#[async_trait::async_trait]
impl MigrationStep for Migration {
    fn version(&self) -> &'static str {
        "v1_cleanup_duplicates"
    }

    async fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        let keep = Query::select()
            .expr(Expr::col(Settings::Id).min())
            .from(Settings::Table)
            .group_by_col(Settings::Title)
            .to_owned();

        let delete = Query::delete()
            .from_table(Settings::Table)
            .and_where(Expr::col(Settings::Id).not_in_subquery(keep))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    Title,
}
