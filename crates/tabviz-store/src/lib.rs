//! Tabviz Exemplar Store
//!
//! Implements the `ExampleStore` trait using SQLite + HNSW vector indices.
//!
//! # Architecture
//!
//! - SQLite holds every exemplar and guideline row (document, chart
//!   decision, embedding as JSON)
//! - Two in-memory HNSW indices (exemplars, guidelines) serve the
//!   nearest-neighbour lookups and are rebuilt from SQLite on open
//! - An [`EmbeddingModel`] turns documents and queries into vectors
//!
//! Writes are append-only and serialized: the row insert and the index
//! insert happen under one connection lock inside one transaction, so a
//! reader never sees an exemplar without its metadata.
//!
//! # Examples
//!
//! ```
//! use tabviz_domain::{ChartType, ExemplarMetadata};
//! use tabviz_domain::traits::ExampleStore;
//! use tabviz_store::{ExemplarStore, MockEmbeddingModel};
//!
//! let store = ExemplarStore::in_memory(MockEmbeddingModel::new(64)).unwrap();
//! let document = r#"[{"month":"Jan","sales":100}]"#;
//! store
//!     .add_document("ex_0", document, ExemplarMetadata {
//!         chart_type: ChartType::Line,
//!         x_column: "month".into(),
//!         y_column: "sales".into(),
//!     })
//!     .unwrap();
//!
//! let query = store.embed(document).unwrap();
//! let nearest = store.nearest_neighbors(&query, 1).unwrap();
//! assert_eq!(nearest[0].metadata.chart_type, ChartType::Line);
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod ingest;
pub mod vector_index;

use rusqlite::{params, Connection, OptionalExtension};
use std::fmt::Display;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tabviz_domain::traits::{EmbeddingModel, ExampleStore};
use tabviz_domain::{ChartType, Exemplar, ExemplarMetadata, Neighbor};
use thiserror::Error;
use tracing::{debug, info};

pub use embedding::{cosine_similarity, EmbeddingError, MockEmbeddingModel};
pub use ingest::{export_jsonl, import_jsonl, infer_axes, ingest_csv, IngestReport, PersistedExemplar};
pub use vector_index::{VectorIndex, VectorIndexError};

/// Search quality parameter for HNSW queries
const EF_SEARCH: usize = 64;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Vector index error
    #[error("Index error: {0}")]
    Index(#[from] VectorIndexError),

    /// Embedding model failure
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// An entry with this id already exists
    #[error("Duplicate id: {0}")]
    Duplicate(String),

    /// Reading or writing an exchange file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Exemplar,
    Guideline,
}

impl Kind {
    fn as_str(&self) -> &'static str {
        match self {
            Kind::Exemplar => "exemplar",
            Kind::Guideline => "guideline",
        }
    }
}

/// SQLite + HNSW exemplar store
///
/// Safe to share across threads behind an `Arc`: ingestion and
/// classification may run concurrently.
pub struct ExemplarStore<E = MockEmbeddingModel> {
    conn: Mutex<Connection>,
    exemplars: VectorIndex,
    guidelines: VectorIndex,
    embedder: E,
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(StoreError::InvalidData(message)),
    )
}

fn decode_embedding(column: usize, raw: &str) -> rusqlite::Result<Vec<f32>> {
    serde_json::from_str(raw).map_err(|e| conversion_error(column, format!("embedding: {}", e)))
}

/// Map an `id, document, chart_type, x_column, y_column, embedding` row
fn row_to_exemplar(row: &rusqlite::Row<'_>) -> rusqlite::Result<Exemplar> {
    let chart_type: String = row.get(2)?;
    let chart_type = ChartType::parse(&chart_type)
        .ok_or_else(|| conversion_error(2, format!("unknown chart type '{}'", chart_type)))?;
    let embedding: String = row.get(5)?;

    Ok(Exemplar {
        id: row.get(0)?,
        document: row.get(1)?,
        metadata: ExemplarMetadata {
            chart_type,
            x_column: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            y_column: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        },
        embedding: decode_embedding(5, &embedding)?,
    })
}

impl<E> ExemplarStore<E>
where
    E: EmbeddingModel,
    E::Error: Display,
{
    /// Open (or create) a store at `path`
    ///
    /// Use `:memory:` for an in-memory database. Existing rows are loaded
    /// into the vector indices; a stored embedding whose length differs
    /// from the embedder's dimension is an error.
    pub fn open<P: AsRef<Path>>(path: P, embedder: E) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self::from_connection(conn, embedder)?;
        store.rebuild_indices()?;
        Ok(store)
    }

    /// Create an empty in-memory store
    pub fn in_memory(embedder: E) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, embedder)
    }

    fn from_connection(conn: Connection, embedder: E) -> Result<Self, StoreError> {
        conn.execute_batch(include_str!("schema.sql"))?;

        let dimension = embedder.dimension();
        Ok(Self {
            conn: Mutex::new(conn),
            exemplars: VectorIndex::new(dimension),
            guidelines: VectorIndex::new(dimension),
            embedder,
        })
    }

    fn rebuild_indices(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, kind, embedding FROM exemplars ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (id, kind, embedding) in rows {
            let embedding = decode_embedding(2, &embedding)?;
            if kind == Kind::Guideline.as_str() {
                self.guidelines.add(id, &embedding)?;
            } else {
                self.exemplars.add(id, &embedding)?;
            }
        }

        info!(
            "Loaded {} exemplars and {} guidelines",
            self.exemplars.len(),
            self.guidelines.len()
        );
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::InvalidData("connection lock poisoned".to_string()))
    }

    /// The embedding model
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Dimension of stored embeddings
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    /// Embed text with the store's model
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        self.embedder
            .embed(text)
            .map_err(|e| StoreError::Embedding(e.to_string()))
    }

    /// Embed `document` and store it as an exemplar
    pub fn add_document(
        &self,
        id: impl Into<String>,
        document: impl Into<String>,
        metadata: ExemplarMetadata,
    ) -> Result<Exemplar, StoreError> {
        let document = document.into();
        let exemplar = Exemplar {
            id: id.into(),
            embedding: self.embed_text(&document)?,
            document,
            metadata,
        };
        self.add_exemplar(&exemplar)?;
        Ok(exemplar)
    }

    /// Store a fully-formed exemplar
    ///
    /// Only `bar` and `line` exemplars are accepted.
    pub fn add_exemplar(&self, exemplar: &Exemplar) -> Result<(), StoreError> {
        if !exemplar.metadata.chart_type.is_exemplar_type() {
            return Err(StoreError::InvalidData(format!(
                "exemplar {} has chart type '{}', expected bar or line",
                exemplar.id, exemplar.metadata.chart_type
            )));
        }

        self.insert(
            Kind::Exemplar,
            &exemplar.id,
            &exemplar.document,
            Some(&exemplar.metadata),
            &exemplar.embedding,
        )?;
        debug!("Stored exemplar {}", exemplar.id);
        Ok(())
    }

    /// Embed and store a free-text guideline
    pub fn add_guideline(&self, id: impl Into<String>, text: &str) -> Result<(), StoreError> {
        let id = id.into();
        let embedding = self.embed_text(text)?;
        self.insert(Kind::Guideline, &id, text, None, &embedding)?;
        debug!("Stored guideline {}", id);
        Ok(())
    }

    fn insert(
        &self,
        kind: Kind,
        id: &str,
        document: &str,
        metadata: Option<&ExemplarMetadata>,
        embedding: &[f32],
    ) -> Result<(), StoreError> {
        let index = match kind {
            Kind::Exemplar => &self.exemplars,
            Kind::Guideline => &self.guidelines,
        };
        if embedding.len() != index.dimension() {
            return Err(VectorIndexError::DimensionMismatch {
                expected: index.dimension(),
                actual: embedding.len(),
            }
            .into());
        }

        let mut conn = self.conn()?;

        let exists = conn
            .query_row("SELECT 1 FROM exemplars WHERE id = ?1", params![id], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Duplicate(id.to_string()));
        }

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO exemplars (id, kind, document, chart_type, x_column, y_column, embedding)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                kind.as_str(),
                document,
                metadata.map(|m| m.chart_type.as_str()),
                metadata.map(|m| m.x_column.as_str()),
                metadata.map(|m| m.y_column.as_str()),
                serde_json::to_string(embedding)?,
            ],
        )?;
        index.add(id, embedding)?;
        tx.commit()?;

        Ok(())
    }

    /// Look up one exemplar by id
    pub fn get(&self, id: &str) -> Result<Option<Exemplar>, StoreError> {
        let conn = self.conn()?;
        let exemplar = conn
            .query_row(
                "SELECT id, document, chart_type, x_column, y_column, embedding
                 FROM exemplars WHERE id = ?1 AND kind = 'exemplar'",
                params![id],
                row_to_exemplar,
            )
            .optional()?;
        Ok(exemplar)
    }

    /// All exemplars in insertion order
    pub fn exemplars(&self) -> Result<Vec<Exemplar>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, document, chart_type, x_column, y_column, embedding
             FROM exemplars WHERE kind = 'exemplar' ORDER BY rowid",
        )?;
        let exemplars = stmt
            .query_map([], row_to_exemplar)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(exemplars)
    }

    /// Number of stored exemplars
    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    /// Whether no exemplar is stored
    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    /// Number of stored guidelines
    pub fn guideline_count(&self) -> usize {
        self.guidelines.len()
    }
}

impl<E> ExampleStore for ExemplarStore<E>
where
    E: EmbeddingModel,
    E::Error: Display,
{
    type Error = StoreError;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        self.embed_text(text)
    }

    fn nearest_neighbors(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, Self::Error> {
        let hits = self.exemplars.search(vector, k, EF_SEARCH)?;

        let mut neighbors = Vec::with_capacity(hits.len());
        for (id, _) in hits {
            let Some(exemplar) = self.get(&id)? else {
                continue;
            };
            neighbors.push(Neighbor {
                similarity: cosine_similarity(vector, &exemplar.embedding),
                exemplar_id: exemplar.id,
                metadata: exemplar.metadata,
            });
        }

        neighbors.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(neighbors)
    }

    fn nearest_guideline(&self, vector: &[f32]) -> Result<Option<String>, Self::Error> {
        let Some((id, _)) = self.guidelines.search(vector, 1, EF_SEARCH)?.into_iter().next() else {
            return Ok(None);
        };

        let conn = self.conn()?;
        let text = conn
            .query_row(
                "SELECT document FROM exemplars WHERE id = ?1 AND kind = 'guideline'",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }
}
