//! Budget snapshots.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tessera_core::snapshot::{BudgetSnapshot, SnapshotBaseline};
use tessera_core::store::{SnapshotStore, StoreResult};
use tessera_shared::types::WorkpackageId;
use tracing::debug;

use super::{PgStore, convert, db_err};
use crate::entities::budget_snapshots;

fn row(snapshot: &BudgetSnapshot) -> StoreResult<budget_snapshots::ActiveModel> {
    let (eti, recursos, materiais) = match snapshot.baseline {
        SnapshotBaseline::EtiDb {
            orcamento_previsto_com_eti,
        } => (Some(orcamento_previsto_com_eti), None, None),
        SnapshotBaseline::Detailed {
            previsto_recursos_snapshot,
            previsto_materiais_snapshot,
        } => (
            None,
            Some(previsto_recursos_snapshot),
            Some(previsto_materiais_snapshot),
        ),
    };
    Ok(budget_snapshots::ActiveModel {
        id: Set(snapshot.id.into_inner()),
        workpackage_id: Set(snapshot.workpackage_id.into_inner()),
        version: Set(convert::signed("version", snapshot.version)?),
        costing_model: Set(snapshot.costing_model().as_str().to_string()),
        orcamento_previsto_com_eti: Set(eti),
        previsto_recursos_snapshot: Set(recursos),
        previsto_materiais_snapshot: Set(materiais),
        planned_hours: Set(snapshot.planned_hours),
        is_current: Set(true),
        taken_at: Set(snapshot.taken_at.into()),
    })
}

#[async_trait]
impl SnapshotStore for PgStore {
    async fn current(&self, workpackage_id: WorkpackageId) -> StoreResult<Option<BudgetSnapshot>> {
        budget_snapshots::Entity::find()
            .filter(budget_snapshots::Column::WorkpackageId.eq(workpackage_id.into_inner()))
            .filter(budget_snapshots::Column::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(convert::snapshot)
            .transpose()
    }

    async fn history(&self, workpackage_id: WorkpackageId) -> StoreResult<Vec<BudgetSnapshot>> {
        let rows = budget_snapshots::Entity::find()
            .filter(budget_snapshots::Column::WorkpackageId.eq(workpackage_id.into_inner()))
            .order_by_asc(budget_snapshots::Column::Version)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        convert::collect(rows, convert::snapshot)
    }

    async fn replace(&self, snapshot: BudgetSnapshot) -> StoreResult<()> {
        let new_row = row(&snapshot)?;
        let txn = self.db.begin().await.map_err(db_err)?;

        let superseded = budget_snapshots::Entity::update_many()
            .col_expr(budget_snapshots::Column::IsCurrent, Expr::value(false))
            .filter(budget_snapshots::Column::WorkpackageId.eq(snapshot.workpackage_id.into_inner()))
            .filter(budget_snapshots::Column::IsCurrent.eq(true))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        // A stale version hits uq_snapshot_version and surfaces as a conflict.
        new_row.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        debug!(
            workpackage_id = %snapshot.workpackage_id,
            version = snapshot.version,
            superseded = superseded.rows_affected,
            "Snapshot row written"
        );
        Ok(())
    }
}
