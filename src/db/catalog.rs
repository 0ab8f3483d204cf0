//! Catalog database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Row, params};

use crate::models::{CatalogTool, ToolStatus};

use super::Database;

fn parse_datetime(raw: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn tool_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogTool> {
    Ok(CatalogTool {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        monthly_price: row.get(4)?,
        website: row.get(5)?,
        affiliate_url: row.get(6)?,
        status: ToolStatus::from(row.get::<_, String>(7)?.as_str()),
        created_at: parse_datetime(row.get(8)?),
        updated_at: parse_datetime(row.get(9)?),
    })
}

const TOOL_COLUMNS: &str = "id, name, category, description, monthly_price, \
                            website, affiliate_url, status, created_at, updated_at";

impl Database {
    /// Insert a new catalog entry
    pub fn insert_tool(&self, tool: &CatalogTool) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO tools (name, category, description, monthly_price, website, \
             affiliate_url, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                tool.name,
                tool.category,
                tool.description,
                tool.monthly_price,
                tool.website,
                tool.affiliate_url,
                tool.status.as_str(),
                tool.created_at.to_rfc3339(),
                tool.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a tool by exact name (case-insensitive)
    pub fn get_tool_by_name(&self, name: &str) -> Result<Option<CatalogTool>> {
        let result = self.conn.query_row(
            &format!("SELECT {TOOL_COLUMNS} FROM tools WHERE name = ?1 COLLATE NOCASE"),
            [name],
            tool_from_row,
        );

        match result {
            Ok(tool) => Ok(Some(tool)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve an AI-suggested tool name against the approved catalog
    ///
    /// Case-insensitive substring match, first match wins, zero or one
    /// result. This is a best-effort join: the model's free-text name and
    /// the canonical catalog name rarely match exactly.
    pub fn find_approved_by_name(&self, name: &str) -> Result<Option<CatalogTool>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let pattern = format!("%{}%", name.to_lowercase());
        let result = self.conn.query_row(
            &format!(
                "SELECT {TOOL_COLUMNS} FROM tools \
                 WHERE status = 'approved' AND lower(name) LIKE ?1 \
                 ORDER BY id LIMIT 1"
            ),
            [pattern],
            tool_from_row,
        );

        match result {
            Ok(tool) => Ok(Some(tool)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all catalog entries, optionally filtered by status
    pub fn list_tools(&self, status: Option<ToolStatus>) -> Result<Vec<CatalogTool>> {
        let mut tools = Vec::new();

        match status {
            Some(status) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {TOOL_COLUMNS} FROM tools WHERE status = ?1 ORDER BY name"
                ))?;
                let rows = stmt.query_map([status.as_str()], tool_from_row)?;
                for row in rows {
                    tools.push(row?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("SELECT {TOOL_COLUMNS} FROM tools ORDER BY name"))?;
                let rows = stmt.query_map([], tool_from_row)?;
                for row in rows {
                    tools.push(row?);
                }
            }
        }

        Ok(tools)
    }

    /// Search catalog entries by substring, any status
    pub fn search_tools(&self, query: &str) -> Result<Vec<CatalogTool>> {
        let pattern = format!("%{}%", query.to_lowercase());
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TOOL_COLUMNS} FROM tools WHERE lower(name) LIKE ?1 ORDER BY name"
        ))?;

        let rows = stmt.query_map([pattern], tool_from_row)?;
        let mut tools = Vec::new();
        for row in rows {
            tools.push(row?);
        }
        Ok(tools)
    }

    /// Update the moderation status of a tool
    pub fn set_tool_status(&self, name: &str, status: ToolStatus) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE tools SET status = ?1, updated_at = ?2 WHERE name = ?3 COLLATE NOCASE",
            params![status.as_str(), Utc::now().to_rfc3339(), name],
        )?;
        Ok(updated > 0)
    }

    /// Number of catalog entries
    pub fn tool_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM tools", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert_tool(
            &CatalogTool::new("Supabase")
                .with_category("database")
                .with_monthly_price(25.0)
                .approved(),
        )
        .unwrap();
        db.insert_tool(
            &CatalogTool::new("MongoDB Atlas")
                .with_category("database")
                .with_monthly_price(57.0)
                .approved(),
        )
        .unwrap();
        db.insert_tool(&CatalogTool::new("ShadyTool").with_category("misc"))
            .unwrap();
        db
    }

    #[test]
    fn test_find_approved_substring_match() {
        let db = test_db();

        // "mongodb" should match "MongoDB Atlas" case-insensitively
        let found = db.find_approved_by_name("mongodb").unwrap().unwrap();
        assert_eq!(found.name, "MongoDB Atlas");
    }

    #[test]
    fn test_find_approved_skips_pending() {
        let db = test_db();
        assert!(db.find_approved_by_name("ShadyTool").unwrap().is_none());
    }

    #[test]
    fn test_find_approved_no_match() {
        let db = test_db();
        assert!(db.find_approved_by_name("Photoshop").unwrap().is_none());
        assert!(db.find_approved_by_name("").unwrap().is_none());
        assert!(db.find_approved_by_name("   ").unwrap().is_none());
    }

    #[test]
    fn test_get_tool_by_name_exact() {
        let db = test_db();
        let found = db.get_tool_by_name("supabase").unwrap().unwrap();
        assert_eq!(found.name, "Supabase");
        assert!(db.get_tool_by_name("supa").unwrap().is_none());
    }

    #[test]
    fn test_status_workflow() {
        let db = test_db();

        assert!(db.set_tool_status("ShadyTool", ToolStatus::Approved).unwrap());
        let found = db.find_approved_by_name("shady").unwrap().unwrap();
        assert_eq!(found.name, "ShadyTool");

        assert!(!db.set_tool_status("NoSuchTool", ToolStatus::Approved).unwrap());
    }

    #[test]
    fn test_list_tools_filtered() {
        let db = test_db();
        assert_eq!(db.list_tools(None).unwrap().len(), 3);
        assert_eq!(db.list_tools(Some(ToolStatus::Approved)).unwrap().len(), 2);
        assert_eq!(db.list_tools(Some(ToolStatus::Pending)).unwrap().len(), 1);
    }
}
