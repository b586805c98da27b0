use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{News, NewNews, NewsChanges};

const NEWS_COLUMNS: &str =
    "id, title, category, content, author, date, featured, tags, image_url, created_at";

fn parse_news_row(row: &rusqlite::Row) -> rusqlite::Result<News> {
    let tags: String = row.get(7)?;
    let tags = serde_json::from_str(&tags)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(News {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        content: row.get(3)?,
        author: row.get(4)?,
        date: row.get(5)?,
        featured: row.get(6)?,
        tags,
        image_url: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn encode_tags(tags: &[String]) -> Result<String> {
    serde_json::to_string(tags).context("Failed to encode news tags")
}

/// All news items, newest first
pub fn list_all(conn: &mut DbConn) -> Result<Vec<News>> {
    let sql = format!("SELECT {NEWS_COLUMNS} FROM news ORDER BY created_at DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_news_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list news")?;

    Ok(rows)
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<News>> {
    let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_news_row)
        .optional()
        .context("Failed to query news by id")
}

pub fn insert(conn: &mut DbConn, news: &NewNews) -> Result<News> {
    let sql = format!(
        "INSERT INTO news (title, category, content, author, date, featured, tags, image_url) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {NEWS_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            news.title,
            news.category,
            news.content,
            news.author,
            news.date,
            news.featured,
            encode_tags(&news.tags)?,
            news.image_url
        ],
        parse_news_row,
    )
    .with_context(|| format!("Failed to create news {:?}", news.title))
}

/// Apply a partial update. Returns `None` when no item has this id.
pub fn update(conn: &mut DbConn, id: i64, changes: &NewsChanges) -> Result<Option<News>> {
    let tags = changes.tags.as_deref().map(encode_tags).transpose()?;
    let sql = format!(
        "UPDATE news SET title = COALESCE(?1, title), category = COALESCE(?2, category), \
         content = COALESCE(?3, content), author = COALESCE(?4, author), date = COALESCE(?5, date), \
         featured = COALESCE(?6, featured), tags = COALESCE(?7, tags), image_url = COALESCE(?8, image_url) \
         WHERE id = ?9 RETURNING {NEWS_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            changes.title,
            changes.category,
            changes.content,
            changes.author,
            changes.date,
            changes.featured,
            tags,
            changes.image_url,
            id
        ],
        parse_news_row,
    )
    .optional()
    .with_context(|| format!("Failed to update news {id}"))
}

/// Returns false when no item has this id
pub fn delete(conn: &mut DbConn, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM news WHERE id = ?1", params![id])
        .with_context(|| format!("Failed to delete news {id}"))?;
    Ok(deleted > 0)
}

pub fn delete_all(conn: &mut DbConn) -> Result<usize> {
    conn.execute("DELETE FROM news", [])
        .context("Failed to delete news")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_connection, open_memory};
    use chrono::NaiveDate;

    fn draft(title: &str) -> NewNews {
        NewNews {
            title: title.to_string(),
            category: "Tournament".to_string(),
            content: "Body".to_string(),
            author: "Desk".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            featured: false,
            tags: vec!["all-england".to_string()],
            image_url: None,
        }
    }

    #[test]
    fn create_and_list_newest_first() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let first = insert(&mut conn, &draft("First")).unwrap();
        let second = insert(&mut conn, &draft("Second")).unwrap();

        let all = list_all(&mut conn).unwrap();

        assert_eq!(all.iter().map(|n| n.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert_eq!(all[0].tags, vec!["all-england".to_string()]);
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let created = insert(&mut conn, &draft("Original")).unwrap();

        let changes = NewsChanges {
            featured: Some(true),
            tags: Some(vec![]),
            ..NewsChanges::default()
        };
        let updated = update(&mut conn, created.id, &changes).unwrap().unwrap();

        assert_eq!(updated.title, "Original");
        assert_eq!(updated.content, "Body");
        assert!(updated.featured);
        assert!(updated.tags.is_empty());
        assert!(update(&mut conn, 999, &changes).unwrap().is_none());
    }

    #[test]
    fn delete_one_and_all() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let a = insert(&mut conn, &draft("A")).unwrap();
        insert(&mut conn, &draft("B")).unwrap();
        insert(&mut conn, &draft("C")).unwrap();

        assert!(delete(&mut conn, a.id).unwrap());
        assert!(!delete(&mut conn, a.id).unwrap());
        assert!(find_by_id(&mut conn, a.id).unwrap().is_none());
        assert_eq!(delete_all(&mut conn).unwrap(), 2);
        assert!(list_all(&mut conn).unwrap().is_empty());
    }
}
