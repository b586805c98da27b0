use anyhow::{Context, Result};

use super::connection::{get_connection, DbConn, DbPool};

/// Create any missing tables. Safe to run against an existing database.
pub fn init_schema(conn: &mut DbConn) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::info!("Database schema ready");
    Ok(())
}

/// Open a pool and make sure the schema exists
pub fn open_pool(pool: DbPool) -> Result<DbPool> {
    {
        let mut conn = get_connection(&pool)?;
        init_schema(&mut conn)?;
    }
    Ok(pool)
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &mut DbConn, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}
