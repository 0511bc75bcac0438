//! Table API surface of the BaaS (PostgREST-style).
//!
//! Filters are passed as `(column, predicate)` query pairs, e.g.
//! `("owner", "eq.{uuid}")` or `("order", "created_at.desc")`. Inserts can
//! request columns back via `select`; the record store uses that to get the
//! new row id in the same round trip.

use anyhow::{Context, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::BaasClient;

impl BaasClient {
    fn table_path(table: &str) -> String {
        format!("/rest/v1/{}", table)
    }

    /// Insert one row and return the requested columns of the created row.
    pub async fn rest_insert_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        body: &B,
        select: &str,
    ) -> Result<T> {
        let request = self
            .request(Method::POST, &Self::table_path(table))
            .query(&[("select", select)])
            .header("Prefer", "return=representation")
            .json(body);

        // PostgREST returns an array even for single-row inserts.
        let mut rows: Vec<T> = self.send_json(request).await?;
        rows.pop()
            .ok_or_else(|| anyhow::anyhow!("Insert into {} returned no rows", table))
    }

    /// Insert one row without asking anything back.
    pub async fn rest_insert<B: Serialize>(&self, table: &str, body: &B) -> Result<()> {
        let request = self
            .request(Method::POST, &Self::table_path(table))
            .header("Prefer", "return=minimal")
            .json(body);
        self.send(request).await?;
        Ok(())
    }

    /// Select rows with filter/order/limit query pairs.
    pub async fn rest_select<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut request = self
            .request(Method::GET, &Self::table_path(table))
            .query(&[("select", select)]);
        if !filters.is_empty() {
            request = request.query(filters);
        }
        self.send_json(request).await
    }

    /// Select at most one row (`maybeSingle` in the source app).
    pub async fn rest_select_maybe_one<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<T>> {
        let mut filters = filters.to_vec();
        filters.push(("limit", "1".to_string()));
        let mut rows = self.rest_select::<T>(table, select, &filters).await?;
        Ok(rows.pop())
    }

    /// Delete rows matching the filters. Refuses an unfiltered delete.
    pub async fn rest_delete(&self, table: &str, filters: &[(&str, String)]) -> Result<()> {
        if filters.is_empty() {
            return Err(anyhow::anyhow!(
                "Refusing to delete from {} without filters",
                table
            ));
        }
        let request = self
            .request(Method::DELETE, &Self::table_path(table))
            .query(filters);
        self.send(request).await?;
        Ok(())
    }

    /// Insert-or-update keyed on the table's primary key.
    pub async fn rest_upsert<B: Serialize>(&self, table: &str, body: &B) -> Result<()> {
        let request = self
            .request(Method::POST, &Self::table_path(table))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(body);
        self.send(request)
            .await
            .with_context(|| format!("Upsert into {} failed", table))?;
        Ok(())
    }
}
