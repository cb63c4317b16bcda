//! Collection names shared by the migration pipeline and the query side.

pub const MOVIES: &str = "movies";
pub const PERSONS: &str = "persons";
pub const TITLES: &str = "titles";
pub const GENRES: &str = "genres";
pub const PROFESSIONS: &str = "professions";
pub const CHARACTERS: &str = "characters";
pub const MOVIE_TITLES: &str = "movie_titles";
pub const TITLE_ORDERING: &str = "title_ordering";
pub const MOVIE_GENRES: &str = "movie_genres";
pub const PERSON_PROFESSION: &str = "person_profession";
pub const KNOWN_FOR: &str = "known_for";
pub const PRINCIPALS: &str = "principals";
pub const MOVIE_CAST: &str = "movie_cast";
pub const RATINGS: &str = "ratings";

/// The assembled per-movie documents, keyed by movie id.
pub const MOVIES_COMPLETE: &str = "movies_complete";
