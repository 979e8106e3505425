//! Catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD + filtered listing over genres, bands and records.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call model `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing honors the normalized `FilterSpec` unchanged.

use crate::model::catalog::{Band, BandId, Genre, GenreId, Record, RecordId};
use crate::query::normalizer::FilterSpec;
use crate::repo::{
    append_filter_clauses, append_order_and_page, ensure_connection_ready, parse_stored_uuid,
    RepoError, RepoResult, TableRequirement,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const GENRE_SELECT_SQL: &str = "SELECT uuid, name, description FROM genres";
const BAND_SELECT_SQL: &str = "SELECT uuid, name, genre_id, formed_year FROM bands";
const RECORD_SELECT_SQL: &str =
    "SELECT uuid, title, band_id, genre_id, price_cents, released_year FROM records";

const CATALOG_REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "genres",
        columns: &["uuid", "name", "description", "created_at", "updated_at"],
    },
    TableRequirement {
        table: "bands",
        columns: &["uuid", "name", "genre_id", "formed_year", "created_at", "updated_at"],
    },
    TableRequirement {
        table: "records",
        columns: &[
            "uuid",
            "title",
            "band_id",
            "genre_id",
            "price_cents",
            "released_year",
            "created_at",
            "updated_at",
        ],
    },
];

/// Repository interface for catalog persistence.
pub trait CatalogRepository {
    fn create_genre(&self, genre: &Genre) -> RepoResult<GenreId>;
    fn update_genre(&self, genre: &Genre) -> RepoResult<()>;
    fn delete_genre(&self, id: GenreId) -> RepoResult<()>;
    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>>;
    fn list_genres(&self, spec: &FilterSpec) -> RepoResult<Vec<Genre>>;

    fn create_band(&self, band: &Band) -> RepoResult<BandId>;
    fn update_band(&self, band: &Band) -> RepoResult<()>;
    fn delete_band(&self, id: BandId) -> RepoResult<()>;
    fn get_band(&self, id: BandId) -> RepoResult<Option<Band>>;
    fn list_bands(&self, spec: &FilterSpec) -> RepoResult<Vec<Band>>;

    fn create_record(&self, record: &Record) -> RepoResult<RecordId>;
    fn update_record(&self, record: &Record) -> RepoResult<()>;
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
    fn list_records(&self, spec: &FilterSpec) -> RepoResult<Vec<Record>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, CATALOG_REQUIREMENTS)?;
        Ok(Self { conn })
    }

    fn list_rows<T>(
        &self,
        base_select: &str,
        spec: &FilterSpec,
        parse: impl Fn(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Vec<T>> {
        let mut sql = format!("{base_select} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        append_filter_clauses(&mut sql, &mut bind_values, spec);
        append_order_and_page(&mut sql, &mut bind_values, spec);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse(row)?);
        }
        Ok(items)
    }

    fn delete_row(&self, table: &str, resource: &'static str, id: uuid::Uuid) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {table} WHERE uuid = ?1;"), [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { resource, id });
        }
        Ok(())
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_genre(&self, genre: &Genre) -> RepoResult<GenreId> {
        genre.validate()?;
        self.conn.execute(
            "INSERT INTO genres (uuid, name, description) VALUES (?1, ?2, ?3);",
            params![
                genre.id.to_string(),
                genre.name.as_str(),
                genre.description.as_deref(),
            ],
        )?;
        Ok(genre.id)
    }

    fn update_genre(&self, genre: &Genre) -> RepoResult<()> {
        genre.validate()?;
        let changed = self.conn.execute(
            "UPDATE genres
             SET
                name = ?1,
                description = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![
                genre.name.as_str(),
                genre.description.as_deref(),
                genre.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                resource: "genre",
                id: genre.id,
            });
        }
        Ok(())
    }

    fn delete_genre(&self, id: GenreId) -> RepoResult<()> {
        self.delete_row("genres", "genre", id)
    }

    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GENRE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_genre_row(row)?));
        }
        Ok(None)
    }

    fn list_genres(&self, spec: &FilterSpec) -> RepoResult<Vec<Genre>> {
        self.list_rows(GENRE_SELECT_SQL, spec, parse_genre_row)
    }

    fn create_band(&self, band: &Band) -> RepoResult<BandId> {
        band.validate()?;
        self.conn.execute(
            "INSERT INTO bands (uuid, name, genre_id, formed_year) VALUES (?1, ?2, ?3, ?4);",
            params![
                band.id.to_string(),
                band.name.as_str(),
                band.genre_id.to_string(),
                band.formed_year,
            ],
        )?;
        Ok(band.id)
    }

    fn update_band(&self, band: &Band) -> RepoResult<()> {
        band.validate()?;
        let changed = self.conn.execute(
            "UPDATE bands
             SET
                name = ?1,
                genre_id = ?2,
                formed_year = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                band.name.as_str(),
                band.genre_id.to_string(),
                band.formed_year,
                band.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                resource: "band",
                id: band.id,
            });
        }
        Ok(())
    }

    fn delete_band(&self, id: BandId) -> RepoResult<()> {
        self.delete_row("bands", "band", id)
    }

    fn get_band(&self, id: BandId) -> RepoResult<Option<Band>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BAND_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_band_row(row)?));
        }
        Ok(None)
    }

    fn list_bands(&self, spec: &FilterSpec) -> RepoResult<Vec<Band>> {
        self.list_rows(BAND_SELECT_SQL, spec, parse_band_row)
    }

    fn create_record(&self, record: &Record) -> RepoResult<RecordId> {
        record.validate()?;
        self.conn.execute(
            "INSERT INTO records (uuid, title, band_id, genre_id, price_cents, released_year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.id.to_string(),
                record.title.as_str(),
                record.band_id.to_string(),
                record.genre_id.to_string(),
                record.price_cents,
                record.released_year,
            ],
        )?;
        Ok(record.id)
    }

    fn update_record(&self, record: &Record) -> RepoResult<()> {
        record.validate()?;
        let changed = self.conn.execute(
            "UPDATE records
             SET
                title = ?1,
                band_id = ?2,
                genre_id = ?3,
                price_cents = ?4,
                released_year = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                record.title.as_str(),
                record.band_id.to_string(),
                record.genre_id.to_string(),
                record.price_cents,
                record.released_year,
                record.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                resource: "record",
                id: record.id,
            });
        }
        Ok(())
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        self.delete_row("records", "record", id)
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }
        Ok(None)
    }

    fn list_records(&self, spec: &FilterSpec) -> RepoResult<Vec<Record>> {
        self.list_rows(RECORD_SELECT_SQL, spec, parse_record_row)
    }
}

fn parse_genre_row(row: &Row<'_>) -> RepoResult<Genre> {
    let uuid_text: String = row.get("uuid")?;
    let genre = Genre {
        id: parse_stored_uuid(&uuid_text, "genres", "uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
    };
    genre.validate()?;
    Ok(genre)
}

fn parse_band_row(row: &Row<'_>) -> RepoResult<Band> {
    let uuid_text: String = row.get("uuid")?;
    let genre_text: String = row.get("genre_id")?;
    let band = Band {
        id: parse_stored_uuid(&uuid_text, "bands", "uuid")?,
        name: row.get("name")?,
        genre_id: parse_stored_uuid(&genre_text, "bands", "genre_id")?,
        formed_year: row.get("formed_year")?,
    };
    band.validate()?;
    Ok(band)
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let uuid_text: String = row.get("uuid")?;
    let band_text: String = row.get("band_id")?;
    let genre_text: String = row.get("genre_id")?;
    let record = Record {
        id: parse_stored_uuid(&uuid_text, "records", "uuid")?,
        title: row.get("title")?,
        band_id: parse_stored_uuid(&band_text, "records", "band_id")?,
        genre_id: parse_stored_uuid(&genre_text, "records", "genre_id")?,
        price_cents: row.get("price_cents")?,
        released_year: row.get("released_year")?,
    };
    record.validate()?;
    Ok(record)
}
