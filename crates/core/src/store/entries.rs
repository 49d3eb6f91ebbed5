//! Entry CRUD operations on partitions.
//!
//! Writes are UPSERTs keyed by (partition, method, url); concurrent writes
//! to the same key serialize inside SQLite, last write wins.

use super::connection::StoreDb;
use crate::http::{CachedResponse, Method, Request};
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl StoreDb {
    /// Insert or overwrite the entry for `request` in `partition`.
    pub async fn put_entry(
        &self,
        partition: &str,
        request: &Request,
        response: &CachedResponse,
    ) -> Result<(), Error> {
        let partition = partition.to_string();
        let method = request.method.as_str();
        let url = request.url.as_str().to_string();
        let status = response.status as i64;
        let headers_json = serde_json::to_string(&response.headers).map_err(|e| Error::Encode(e.to_string()))?;
        let body = response.body.clone();
        let stored_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (partition, method, url, status, headers_json, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(partition, method, url) DO UPDATE SET
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![partition, method, url, status, headers_json, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up the entry for `request` in `partition`.
    pub async fn match_entry(&self, partition: &str, request: &Request) -> Result<Option<CachedResponse>, Error> {
        self.match_url(partition, request.method, request.url.as_str()).await
    }

    /// Look up an entry by raw method + URL key.
    pub async fn match_url(&self, partition: &str, method: Method, url: &str) -> Result<Option<CachedResponse>, Error> {
        let partition = partition.to_string();
        let method = method.as_str();
        let url = url.to_string();

        self.conn
            .call(move |conn| -> Result<Option<CachedResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT status, headers_json, body FROM entries
                     WHERE partition = ?1 AND method = ?2 AND url = ?3",
                )?;

                let result = stmt.query_row(params![partition, method, url], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, Vec<u8>>(2)?))
                });

                match result {
                    Ok((status, headers_json, body)) => {
                        let headers = serde_json::from_str(&headers_json).unwrap_or_else(|e| {
                            tracing::warn!("discarding unreadable header snapshot: {e}");
                            Vec::new()
                        });
                        Ok(Some(CachedResponse { status: status as u16, headers, body }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// All partition names with at least one entry, sorted.
    pub async fn partition_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT DISTINCT partition FROM entries ORDER BY partition")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry of `partition`. Returns the number of entries removed.
    pub async fn delete_partition(&self, partition: &str) -> Result<u64, Error> {
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries WHERE partition = ?1", params![partition])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in `partition`.
    pub async fn entry_count(&self, partition: &str) -> Result<u64, Error> {
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE partition = ?1",
                    params![partition],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn req(url: &str) -> Request {
        Request::get(Url::parse(url).unwrap())
    }

    fn resp(status: u16, body: &[u8]) -> CachedResponse {
        CachedResponse::with_body(status, body)
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let request = req("https://app.example.com/index.html");
        let mut response = resp(200, b"<html>");
        response.headers.push(("Content-Type".to_string(), "text/html".to_string()));

        db.put_entry("static-v1", &request, &response).await.unwrap();

        let hit = db.match_entry("static-v1", &request).await.unwrap().unwrap();
        assert_eq!(hit, response);
    }

    #[tokio::test]
    async fn test_match_missing() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let hit = db.match_entry("static-v1", &req("https://app.example.com/missing")).await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let request = req("https://cdn.example.net/lib.js");

        db.put_entry("external-v1", &request, &resp(200, b"v1")).await.unwrap();
        db.put_entry("external-v1", &request, &resp(200, b"v2")).await.unwrap();

        let hit = db.match_entry("external-v1", &request).await.unwrap().unwrap();
        assert_eq!(hit.body, b"v2");
        assert_eq!(db.entry_count("external-v1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partitions_are_isolated() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let request = req("https://app.example.com/shared-path");

        db.put_entry("static-v1", &request, &resp(200, b"static copy")).await.unwrap();

        assert!(db.match_entry("external-v1", &request).await.unwrap().is_none());
        assert!(db.match_entry("static-v1", &request).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_method_is_part_of_the_key() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let url = "https://app.example.com/data";
        db.put_entry("static-v1", &req(url), &resp(200, b"get")).await.unwrap();

        let miss = db.match_url("static-v1", Method::Head, url).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_partition_names_sorted_distinct() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.put_entry("b-cache", &req("https://x.example/1"), &resp(200, b"")).await.unwrap();
        db.put_entry("a-cache", &req("https://x.example/2"), &resp(200, b"")).await.unwrap();
        db.put_entry("a-cache", &req("https://x.example/3"), &resp(200, b"")).await.unwrap();

        let names = db.partition_names().await.unwrap();
        assert_eq!(names, vec!["a-cache".to_string(), "b-cache".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_partition() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.put_entry("old-v0", &req("https://x.example/1"), &resp(200, b"")).await.unwrap();
        db.put_entry("old-v0", &req("https://x.example/2"), &resp(200, b"")).await.unwrap();
        db.put_entry("keep-v1", &req("https://x.example/3"), &resp(200, b"")).await.unwrap();

        let deleted = db.delete_partition("old-v0").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(db.partition_names().await.unwrap(), vec!["keep-v1".to_string()]);

        let deleted = db.delete_partition("old-v0").await.unwrap();
        assert_eq!(deleted, 0);
    }
}
