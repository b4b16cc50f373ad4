//! Table bootstrap for the table-backed store

use sqlx::PgPool;

use super::config::TableNames;

/// `CREATE TABLE IF NOT EXISTS` statements for every configured table
pub fn create_statements(tables: &TableNames) -> Vec<String> {
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {spaces} (
                id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                address TEXT NOT NULL,
                lat DOUBLE PRECISION NOT NULL,
                lng DOUBLE PRECISION NOT NULL,
                rating DOUBLE PRECISION NOT NULL DEFAULT 0,
                image_url TEXT,
                description TEXT,
                service_ids TEXT[] NOT NULL DEFAULT '{{}}'
            )
            "#,
            spaces = tables.spaces
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {pricing} (
                id BIGINT PRIMARY KEY,
                space_id BIGINT NOT NULL,
                name TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                billing_period TEXT NOT NULL,
                features TEXT[] NOT NULL DEFAULT '{{}}'
            )
            "#,
            pricing = tables.pricing
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {services} (
                id BIGINT PRIMARY KEY,
                service_id TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL
            )
            "#,
            services = tables.services
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {reports} (
                id UUID PRIMARY KEY,
                space_id BIGINT NOT NULL,
                change_type TEXT NOT NULL,
                current_info TEXT,
                corrected_info TEXT,
                additional_details TEXT,
                contact_email TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            reports = tables.reports
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {posts} (
                slug TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                excerpt TEXT NOT NULL,
                content TEXT NOT NULL,
                author TEXT NOT NULL,
                published_at TIMESTAMPTZ NOT NULL,
                tags TEXT[] NOT NULL DEFAULT '{{}}',
                cover_image_url TEXT
            )
            "#,
            posts = tables.posts
        ),
    ]
}

/// Create any missing tables
pub async fn ensure_schema(pool: &PgPool, tables: &TableNames) -> Result<(), sqlx::Error> {
    for statement in create_statements(tables) {
        sqlx::query(&statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_use_configured_names() {
        let tables = TableNames {
            spaces: "cw_spaces".to_string(),
            pricing: "cw_pricing".to_string(),
            services: "cw_services".to_string(),
            reports: "cw_reports".to_string(),
            posts: "cw_posts".to_string(),
        };
        let statements = create_statements(&tables);
        assert_eq!(statements.len(), 5);
        assert!(statements[0].contains("CREATE TABLE IF NOT EXISTS cw_spaces"));
        assert!(statements[0].contains("DEFAULT '{}'"));
        assert!(statements[4].contains("cw_posts"));
    }
}
