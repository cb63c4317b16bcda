//! SQL schema for the Cinedex relational store.
//!
//! Executed once at connection startup. The value of this layer is the
//! invariant set enforced at write time: primary keys, foreign keys, and
//! the domain checks below. Rows are only ever inserted by the batch
//! loader; nothing updates them in place except the title-flag resolution
//! pass.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The declared primary/original title columns are source hints consumed by
-- the title-resolution pass; the resolved flags live on movie_titles.
CREATE TABLE IF NOT EXISTS movies (
    movie_id        TEXT PRIMARY KEY,
    year            INTEGER,
    runtime_minutes INTEGER,
    primary_title   TEXT,
    original_title  TEXT,

    CHECK (year >= 1895),
    CHECK (runtime_minutes > 0)
);

CREATE TABLE IF NOT EXISTS persons (
    person_id  TEXT PRIMARY KEY,
    name       TEXT,
    birth_year INTEGER,
    death_year INTEGER,

    CHECK (birth_year > 1800),
    CHECK (death_year >= birth_year)
);

-- De-duplicated naming pool, separate from the movie-to-title association:
-- the same string can apply to many movies and regions.
CREATE TABLE IF NOT EXISTS titles (
    title_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    title_name TEXT NOT NULL UNIQUE COLLATE NOCASE
);

CREATE TABLE IF NOT EXISTS genres (
    genre_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    genre_name TEXT NOT NULL UNIQUE COLLATE NOCASE
);

CREATE TABLE IF NOT EXISTS professions (
    profession_id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_name      TEXT NOT NULL UNIQUE COLLATE NOCASE
);

CREATE TABLE IF NOT EXISTS characters (
    character_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL UNIQUE COLLATE NOCASE
);

-- link_id is assigned in insertion order; the resolution ladder uses the
-- lowest link_id as its deterministic tie-break.
CREATE TABLE IF NOT EXISTS movie_titles (
    link_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id    TEXT    NOT NULL REFERENCES movies(movie_id),
    title_id    INTEGER NOT NULL REFERENCES titles(title_id),
    is_primary  INTEGER NOT NULL DEFAULT 0,
    is_original INTEGER NOT NULL DEFAULT 0,

    UNIQUE (movie_id, title_id)
);

CREATE TABLE IF NOT EXISTS title_ordering (
    movie_id TEXT    NOT NULL,
    ordering INTEGER NOT NULL,
    title_id INTEGER NOT NULL,
    region   TEXT,
    language TEXT,

    PRIMARY KEY (movie_id, ordering),
    FOREIGN KEY (movie_id, title_id) REFERENCES movie_titles(movie_id, title_id)
);

CREATE TABLE IF NOT EXISTS movie_genres (
    movie_id TEXT    NOT NULL REFERENCES movies(movie_id),
    genre_id INTEGER NOT NULL REFERENCES genres(genre_id),

    PRIMARY KEY (movie_id, genre_id)
);

CREATE TABLE IF NOT EXISTS person_profession (
    person_id     TEXT    NOT NULL REFERENCES persons(person_id),
    profession_id INTEGER NOT NULL REFERENCES professions(profession_id),

    PRIMARY KEY (person_id, profession_id)
);

CREATE TABLE IF NOT EXISTS known_for (
    person_id TEXT NOT NULL REFERENCES persons(person_id),
    movie_id  TEXT NOT NULL REFERENCES movies(movie_id),

    PRIMARY KEY (person_id, movie_id)
);

CREATE TABLE IF NOT EXISTS principals (
    movie_id      TEXT    NOT NULL REFERENCES movies(movie_id),
    ordering      INTEGER NOT NULL,
    person_id     TEXT    NOT NULL REFERENCES persons(person_id),
    profession_id INTEGER REFERENCES professions(profession_id),
    category      TEXT,

    PRIMARY KEY (movie_id, ordering)
);

CREATE TABLE IF NOT EXISTS movie_cast (
    movie_id     TEXT    NOT NULL REFERENCES movies(movie_id),
    person_id    TEXT    NOT NULL REFERENCES persons(person_id),
    character_id INTEGER NOT NULL REFERENCES characters(character_id),

    PRIMARY KEY (movie_id, person_id, character_id)
);

CREATE TABLE IF NOT EXISTS ratings (
    movie_id       TEXT PRIMARY KEY REFERENCES movies(movie_id),
    average_rating REAL,
    num_votes      INTEGER,

    CHECK (average_rating >= 0 AND average_rating <= 10),
    CHECK (num_votes >= 0)
);

-- Index set driven by the query library's access patterns; keep in sync
-- with queries.rs.
CREATE INDEX IF NOT EXISTS idx_mt_primary  ON movie_titles(is_primary);
CREATE INDEX IF NOT EXISTS idx_pr_movie_id ON principals(movie_id);
CREATE INDEX IF NOT EXISTS idx_pr_person_profession_movie
    ON principals(person_id, profession_id, movie_id);
CREATE INDEX IF NOT EXISTS idx_m_year      ON movies(year);
CREATE INDEX IF NOT EXISTS idx_pe_name     ON persons(name);

PRAGMA user_version = 1;
";
