//! Catalog use-case service: genres, bands, records.
//!
//! # Responsibility
//! - Provide CRUD + list entry points for the unowned catalog resources.
//! - Resolve referenced entities before any write reaches persistence.
//!
//! # Invariants
//! - Reads and lists are open to every authenticated actor.
//! - Mutations route through the access decision with no owner scope, which
//!   admits privileged actors only.
//! - A missing referenced genre/band surfaces NotFound naming the reference,
//!   never a denial.

use crate::access::decision::Operation;
use crate::model::actor::Actor;
use crate::model::catalog::{Band, BandId, Genre, GenreId, Record, RecordId};
use crate::query::fields::{BAND_LIST_FIELDS, GENRE_LIST_FIELDS, RECORD_LIST_FIELDS};
use crate::query::normalizer::{normalize, RawQuery, ScopePolicy};
use crate::repo::catalog_repo::CatalogRepository;
use crate::service::{authorize, ServiceError, ServiceResult};

/// Input shape for genre create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDraft {
    pub name: String,
    pub description: Option<String>,
}

/// Input shape for band create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandDraft {
    pub name: String,
    pub genre_id: GenreId,
    pub formed_year: Option<i32>,
}

/// Input shape for record create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub title: String,
    pub band_id: BandId,
    pub genre_id: GenreId,
    pub price_cents: i64,
    pub released_year: Option<i32>,
}

/// Use-case service for catalog management.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    // -------- genres --------

    pub fn create_genre(&self, actor: &Actor, draft: &GenreDraft) -> ServiceResult<Genre> {
        let genre = Genre::new(draft.name.clone(), draft.description.clone());
        genre.validate()?;
        authorize(actor, Operation::Create, None, "genre")?;
        self.repo.create_genre(&genre)?;
        Ok(genre)
    }

    pub fn update_genre(
        &self,
        actor: &Actor,
        id: GenreId,
        draft: &GenreDraft,
    ) -> ServiceResult<Genre> {
        let genre = Genre {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
        };
        genre.validate()?;
        self.resolve_genre(id)?;
        authorize(actor, Operation::Update, None, "genre")?;
        self.repo.update_genre(&genre)?;
        Ok(genre)
    }

    pub fn delete_genre(&self, actor: &Actor, id: GenreId) -> ServiceResult<()> {
        self.resolve_genre(id)?;
        authorize(actor, Operation::Delete, None, "genre")?;
        self.repo.delete_genre(id)?;
        Ok(())
    }

    pub fn get_genre(&self, id: GenreId) -> ServiceResult<Genre> {
        self.resolve_genre(id)
    }

    pub fn list_genres(&self, actor: &Actor, raw: &RawQuery) -> ServiceResult<Vec<Genre>> {
        let spec = normalize(raw, &GENRE_LIST_FIELDS, actor, ScopePolicy::default())?;
        Ok(self.repo.list_genres(&spec)?)
    }

    // -------- bands --------

    pub fn create_band(&self, actor: &Actor, draft: &BandDraft) -> ServiceResult<Band> {
        let band = Band::new(draft.name.clone(), draft.genre_id, draft.formed_year);
        band.validate()?;
        self.resolve_genre(draft.genre_id)?;
        authorize(actor, Operation::Create, None, "band")?;
        self.repo.create_band(&band)?;
        Ok(band)
    }

    pub fn update_band(&self, actor: &Actor, id: BandId, draft: &BandDraft) -> ServiceResult<Band> {
        let band = Band {
            id,
            name: draft.name.clone(),
            genre_id: draft.genre_id,
            formed_year: draft.formed_year,
        };
        band.validate()?;
        self.resolve_band(id)?;
        self.resolve_genre(draft.genre_id)?;
        authorize(actor, Operation::Update, None, "band")?;
        self.repo.update_band(&band)?;
        Ok(band)
    }

    pub fn delete_band(&self, actor: &Actor, id: BandId) -> ServiceResult<()> {
        self.resolve_band(id)?;
        authorize(actor, Operation::Delete, None, "band")?;
        self.repo.delete_band(id)?;
        Ok(())
    }

    pub fn get_band(&self, id: BandId) -> ServiceResult<Band> {
        self.resolve_band(id)
    }

    pub fn list_bands(&self, actor: &Actor, raw: &RawQuery) -> ServiceResult<Vec<Band>> {
        let spec = normalize(raw, &BAND_LIST_FIELDS, actor, ScopePolicy::default())?;
        Ok(self.repo.list_bands(&spec)?)
    }

    // -------- records --------

    pub fn create_record(&self, actor: &Actor, draft: &RecordDraft) -> ServiceResult<Record> {
        let record = Record::new(
            draft.title.clone(),
            draft.band_id,
            draft.genre_id,
            draft.price_cents,
            draft.released_year,
        );
        record.validate()?;
        self.resolve_band(draft.band_id)?;
        self.resolve_genre(draft.genre_id)?;
        authorize(actor, Operation::Create, None, "record")?;
        self.repo.create_record(&record)?;
        Ok(record)
    }

    pub fn update_record(
        &self,
        actor: &Actor,
        id: RecordId,
        draft: &RecordDraft,
    ) -> ServiceResult<Record> {
        let record = Record {
            id,
            title: draft.title.clone(),
            band_id: draft.band_id,
            genre_id: draft.genre_id,
            price_cents: draft.price_cents,
            released_year: draft.released_year,
        };
        record.validate()?;
        self.resolve_record(id)?;
        self.resolve_band(draft.band_id)?;
        self.resolve_genre(draft.genre_id)?;
        authorize(actor, Operation::Update, None, "record")?;
        self.repo.update_record(&record)?;
        Ok(record)
    }

    pub fn delete_record(&self, actor: &Actor, id: RecordId) -> ServiceResult<()> {
        self.resolve_record(id)?;
        authorize(actor, Operation::Delete, None, "record")?;
        self.repo.delete_record(id)?;
        Ok(())
    }

    pub fn get_record(&self, id: RecordId) -> ServiceResult<Record> {
        self.resolve_record(id)
    }

    pub fn list_records(&self, actor: &Actor, raw: &RawQuery) -> ServiceResult<Vec<Record>> {
        let spec = normalize(raw, &RECORD_LIST_FIELDS, actor, ScopePolicy::default())?;
        Ok(self.repo.list_records(&spec)?)
    }

    // -------- resolution helpers --------

    fn resolve_genre(&self, id: GenreId) -> ServiceResult<Genre> {
        self.repo
            .get_genre(id)?
            .ok_or(ServiceError::NotFound {
                resource: "genre",
                id,
            })
    }

    fn resolve_band(&self, id: BandId) -> ServiceResult<Band> {
        self.repo
            .get_band(id)?
            .ok_or(ServiceError::NotFound {
                resource: "band",
                id,
            })
    }

    fn resolve_record(&self, id: RecordId) -> ServiceResult<Record> {
        self.repo
            .get_record(id)?
            .ok_or(ServiceError::NotFound {
                resource: "record",
                id,
            })
    }
}
