/// Version stamped into `PRAGMA user_version` once [`SCHEMA`] is applied.
pub const SCHEMA_VERSION: i32 = 1;

/// Patient table and its lookup indexes.
///
/// Required fields are enforced here as well as by form validation, so a
/// row can never be stored blank. `rowid` gives store order; an UPDATE
/// leaves a row where it was.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    age INTEGER NOT NULL CHECK (age > 0),
    gender TEXT NOT NULL CHECK (length(gender) > 0),
    department TEXT NOT NULL CHECK (length(department) > 0),
    phone TEXT,
    address TEXT,
    notes TEXT,
    admission_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'admitted'
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
CREATE INDEX IF NOT EXISTS idx_patients_department ON patients(department);
"#;
