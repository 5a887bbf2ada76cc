//! SQLite schema definition.

/// Complete database schema for the wellness engine.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Wellness Profiles
-- ============================================================================

CREATE TABLE IF NOT EXISTS wellness_profiles (
    user_id TEXT PRIMARY KEY,
    age INTEGER NOT NULL DEFAULT 0,
    gender TEXT NOT NULL DEFAULT '',
    wellness_considerations TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    wellness_sensitivities TEXT NOT NULL DEFAULT '[]',    -- JSON array of strings
    monthly_budget REAL NOT NULL DEFAULT 100,
    lifestyle TEXT NOT NULL DEFAULT '{}',                 -- JSON LifestyleProfile
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Lab Data
-- ============================================================================

CREATE TABLE IF NOT EXISTS biomarker_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES wellness_profiles(user_id) ON DELETE CASCADE,
    biomarker_name TEXT NOT NULL,
    biomarker_value REAL NOT NULL,
    unit TEXT,
    measurement_date TEXT NOT NULL,                       -- RFC 3339
    normal_range_low REAL,                                -- NULL = unbounded
    normal_range_high REAL,                               -- NULL = unbounded
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_biomarkers_user ON biomarker_results(user_id, biomarker_name);

CREATE TABLE IF NOT EXISTS genetic_variants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES wellness_profiles(user_id) ON DELETE CASCADE,
    gene TEXT NOT NULL,
    genotype TEXT NOT NULL,
    rsid TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_variants_user ON genetic_variants(user_id);

-- ============================================================================
-- Health Score Snapshots (Append-Only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS health_score_snapshots (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES wellness_profiles(user_id) ON DELETE CASCADE,
    total_score INTEGER NOT NULL,
    biomarker_score INTEGER NOT NULL,
    genetic_score INTEGER NOT NULL,
    lifestyle_score INTEGER NOT NULL,
    breakdown TEXT NOT NULL,                              -- JSON HealthScoreResult
    improvement_tips TEXT NOT NULL DEFAULT '[]',          -- JSON array of strings
    tables_fingerprint TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_snapshots_user ON health_score_snapshots(user_id, recorded_at);

-- Snapshots are never rewritten
CREATE TRIGGER IF NOT EXISTS health_score_snapshots_no_update BEFORE UPDATE ON health_score_snapshots
BEGIN
    SELECT RAISE(ABORT, 'Health score snapshots are immutable');
END;

-- ============================================================================
-- Supplement Plans
-- ============================================================================

CREATE TABLE IF NOT EXISTS supplement_plans (
    plan_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES wellness_profiles(user_id) ON DELETE CASCADE,
    items TEXT NOT NULL DEFAULT '[]',                     -- JSON array of SupplementRecommendation
    total_monthly_cost REAL NOT NULL,
    source TEXT NOT NULL CHECK (source IN ('deterministic', 'external')),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_plans_user ON supplement_plans(user_id, created_at);
"#;
