use std::collections::HashMap;

use fps_common::Rupees;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Contribution, NewContribution, OrderId, PaymentId},
    tally_objects::{HistoryEntry, TallySnapshot},
    traits::ContributionDbError,
};

/// Inserts a new contribution record in `Created` status with the pending payment id sentinel.
///
/// The `UNIQUE` constraint on `order_id` enforces the one-record-per-order invariant; a duplicate insert
/// surfaces as [`ContributionDbError::ContributionAlreadyExists`].
pub async fn insert_contribution(
    contribution: NewContribution,
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Contribution, ContributionDbError> {
    let contribution = sqlx::query_as::<_, Contribution>(
        r#"
            INSERT INTO contributions (order_id, payment_id, name, ward, mobile, amount, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .bind(PaymentId::pending())
    .bind(contribution.name)
    .bind(contribution.ward.to_string())
    .bind(contribution.mobile)
    .bind(contribution.amount)
    .bind(contribution.quantity)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            ContributionDbError::ContributionAlreadyExists(order_id.clone())
        },
        _ => ContributionDbError::from(e),
    })?;
    debug!("📝️ Contribution for order [{}] inserted with id {}", order_id, contribution.id);
    Ok(contribution)
}

/// Returns the contribution record for the corresponding gateway `order_id`, if any.
pub async fn fetch_contribution_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Contribution>, sqlx::Error> {
    let contribution = sqlx::query_as("SELECT * FROM contributions WHERE order_id = $1")
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(contribution)
}

/// Applies the guarded `Created → Success` transition, recording the payment id.
///
/// The status guard in the WHERE clause makes the lookup-and-update a single atomic statement: of two
/// racing callers, exactly one affects a row. Returns the number of rows affected (0 or 1).
pub async fn settle_success(
    order_id: &OrderId,
    payment_id: &PaymentId,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE contributions
            SET status = 'Success', payment_id = $1, updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $2 AND status = 'Created'
        "#,
    )
    .bind(payment_id.as_str())
    .bind(order_id.as_str())
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Applies the guarded `Created → Failed` transition. The payment id is recorded when the gateway
/// supplied one, and left at the pending sentinel otherwise.
pub async fn settle_failed(
    order_id: &OrderId,
    payment_id: Option<&PaymentId>,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE contributions
            SET status = 'Failed', payment_id = COALESCE($1, payment_id), updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $2 AND status = 'Created'
        "#,
    )
    .bind(payment_id.map(PaymentId::as_str))
    .bind(order_id.as_str())
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Recomputes the aggregate totals over the successful subset.
///
/// There is no incremental counter anywhere; every call scans. Pending and failed rows never contribute.
pub async fn fetch_tally(conn: &mut SqliteConnection) -> Result<TallySnapshot, sqlx::Error> {
    let (total_amount, total_quantity): (i64, i64) = sqlx::query_as(
        r#"
            SELECT COALESCE(SUM(amount), 0), COALESCE(SUM(quantity), 0)
            FROM contributions WHERE status = 'Success'
        "#,
    )
    .fetch_one(&mut *conn)
    .await?;
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
            SELECT ward, SUM(amount) FROM contributions WHERE status = 'Success' GROUP BY ward
        "#,
    )
    .fetch_all(conn)
    .await?;
    let ward_totals = rows.into_iter().map(|(ward, amount)| (ward, Rupees::from(amount))).collect::<HashMap<_, _>>();
    Ok(TallySnapshot { total_amount: Rupees::from(total_amount), total_quantity, ward_totals })
}

/// Counts successful contributions, for pagination bookkeeping.
pub async fn count_successful(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contributions WHERE status = 'Success'")
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Fetches one page of successful contributions, newest first. Ties on `created_at` are broken by id so
/// that the ordering, and therefore pagination, is stable.
pub async fn fetch_history_entries(
    limit: i64,
    offset: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<HistoryEntry>, sqlx::Error> {
    let rows: Vec<Contribution> = sqlx::query_as(
        r#"
            SELECT * FROM contributions
            WHERE status = 'Success'
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(HistoryEntry::from).collect())
}
