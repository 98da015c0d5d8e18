//! SeaORM-backed store implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it can be built
//! from a `DatabaseConnection` or any other connection able to open a
//! transaction. Every commit runs inside its own transaction.

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::Customer;
use crate::domain::store::{CustomerStore, StagedChange};
use crate::infra::storage::entity::{Column, Entity as CustomerEntity};
use crate::infra::storage::mapper::{to_insert_model, to_replace_model};

const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `filter` as a literal substring.
fn contains_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for ch in filter.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// SeaORM store impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmCustomerStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCustomerStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> CustomerStore for SeaOrmCustomerStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list(&self, filter: &str) -> anyhow::Result<Vec<Customer>> {
        let mut query = CustomerEntity::find();
        if !filter.is_empty() {
            let like = LikeExpr::new(contains_pattern(filter)).escape(LIKE_ESCAPE);
            query = query.filter(
                Condition::any()
                    .add(Expr::col((CustomerEntity, Column::FirstName)).like(like.clone()))
                    .add(Expr::col((CustomerEntity, Column::LastName)).like(like)),
            );
        }
        let rows = query
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>> {
        let found = CustomerEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Customer>> {
        let rows = CustomerEntity::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("find_by_ids failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists(&self, id: Uuid) -> anyhow::Result<bool> {
        let count = CustomerEntity::find_by_id(id)
            .count(&self.conn)
            .await
            .context("exists failed")?;
        Ok(count > 0)
    }

    async fn commit(&self, changes: Vec<StagedChange>) -> anyhow::Result<u64> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let mut affected = 0u64;

        // Any early return drops `txn`, which rolls it back.
        for change in changes {
            match change {
                StagedChange::Insert(c) => {
                    to_insert_model(c)
                        .insert(&txn)
                        .await
                        .context("insert failed")?;
                    affected += 1;
                }
                StagedChange::Replace(c) => {
                    let id = c.id;
                    let res = CustomerEntity::update_many()
                        .set(to_replace_model(c))
                        .filter(Column::Id.eq(id))
                        .exec(&txn)
                        .await
                        .context("update failed")?;
                    affected += res.rows_affected;
                }
                StagedChange::Remove(id) => {
                    let res = CustomerEntity::delete_by_id(id)
                        .exec(&txn)
                        .await
                        .context("delete failed")?;
                    affected += res.rows_affected;
                }
            }
        }

        txn.commit().await.context("commit failed")?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_in_filter_are_escaped() {
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern("J_hn"), r"%J\_hn%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn plain_filter_is_wrapped() {
        assert_eq!(contains_pattern("Khan"), "%Khan%");
    }
}
