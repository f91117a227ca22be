//! Database schema and migrations for feedsync.
//!
//! Migrations are applied in order when the database is opened; the
//! schema_version table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Channels (tracked feed sources)
    r#"
CREATE TABLE channels (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    url             TEXT NOT NULL UNIQUE,
    title           TEXT,
    last_build_date TEXT,                -- build time reported by the feed at the last sync
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: Articles, one per distinct entry guid
    r#"
CREATE TABLE articles (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    channel_id   INTEGER NOT NULL REFERENCES channels(id),
    guid         TEXT NOT NULL,
    title        TEXT NOT NULL,
    description  TEXT,
    content      TEXT,
    published_at TEXT,
    url          TEXT,
    image_url    TEXT,
    created_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_articles_guid ON articles(guid);
CREATE INDEX idx_articles_channel_id ON articles(channel_id);
"#,
];
