//! DDL statements and migrations for the SQLite schema.
//!
//! Timestamps are stored as TEXT in ISO 8601 format (SQLite has no native
//! datetime type). JSON blobs are TEXT. The full-text index is a standalone
//! FTS5 table rather than a `content=` shadow of `documents`, since the
//! indexed document body lives on disk, not in a column.

/// Current schema version. Bumped whenever DDL or migrations change.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Core DDL statements executed during `init_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // -- Documents table -----------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        path             TEXT NOT NULL UNIQUE,
        doc_type         TEXT NOT NULL,
        state            TEXT NOT NULL DEFAULT 'draft',
        created_at       TEXT NOT NULL,
        modified_at      TEXT NOT NULL,
        author           TEXT,
        feature          TEXT,
        epic             INTEGER,
        story            TEXT,
        content_hash     TEXT,
        owner            TEXT,
        reviewer         TEXT,
        review_due_date  TEXT,
        metadata         TEXT NOT NULL DEFAULT '{}'
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_documents_doc_type ON documents(doc_type)",
    "CREATE INDEX IF NOT EXISTS idx_documents_state ON documents(state)",
    "CREATE INDEX IF NOT EXISTS idx_documents_feature ON documents(feature)",
    "CREATE INDEX IF NOT EXISTS idx_documents_epic ON documents(epic)",
    "CREATE INDEX IF NOT EXISTS idx_documents_owner ON documents(owner)",
    "CREATE INDEX IF NOT EXISTS idx_documents_type_state ON documents(doc_type, state)",
    "CREATE INDEX IF NOT EXISTS idx_documents_feature_type ON documents(feature, doc_type)",
    "CREATE INDEX IF NOT EXISTS idx_documents_modified_at ON documents(modified_at)",
    "CREATE INDEX IF NOT EXISTS idx_documents_review_due_date ON documents(review_due_date)",
    // -- Relationships table ---------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS document_relationships (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        parent_id   INTEGER NOT NULL,
        child_id    INTEGER NOT NULL,
        type        TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        UNIQUE (parent_id, child_id, type),
        FOREIGN KEY (parent_id) REFERENCES documents(id) ON DELETE CASCADE,
        FOREIGN KEY (child_id) REFERENCES documents(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_relationships_parent ON document_relationships(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_child ON document_relationships(child_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_type ON document_relationships(type)",
    // -- State transitions table (audit trail) ----------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS document_transitions (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        document_id  INTEGER NOT NULL,
        from_state   TEXT NOT NULL,
        to_state     TEXT NOT NULL,
        reason       TEXT NOT NULL DEFAULT '',
        changed_by   TEXT NOT NULL,
        changed_at   TEXT NOT NULL,
        FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_transitions_document ON document_transitions(document_id)",
    "CREATE INDEX IF NOT EXISTS idx_transitions_changed_at ON document_transitions(changed_at)",
    // -- Reviews table -----------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS document_reviews (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        document_id       INTEGER NOT NULL,
        reviewer          TEXT NOT NULL,
        reviewed_at       TEXT NOT NULL,
        notes             TEXT,
        next_review_due   TEXT,
        FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_reviews_document ON document_reviews(document_id)",
    // -- Full-text index -----------------------------------------------------------
    r#"
    CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
        path,
        content,
        tags,
        tokenize = 'porter unicode61'
    )
    "#,
    // -- Config / metadata tables (schema bookkeeping) ------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS config (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

/// Default configuration values inserted on first init.
pub const DEFAULT_CONFIG: &[(&str, &str)] = &[("fts_tokenizer", "porter unicode61")];

/// Schema migrations applied after initial DDL.
///
/// Each migration is a `(name, sql)` pair. Migrations are tracked in the
/// `metadata` table under the key `migration:<name>` so they run at most once.
pub const MIGRATIONS: &[(&str, &str)] = &[
    // Future migrations go here, e.g.:
    // ("001_add_foo_column", "ALTER TABLE documents ADD COLUMN foo TEXT DEFAULT ''"),
];
