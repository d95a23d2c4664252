
use super::{Candidate, IndexRecord};
use crate::{FoodieError, config::Config};
use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::{
    Connection,
    query::{ExecutableQuery, QueryBase},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

const TABLE_NAME: &str = "fast_food_menu";
const DEFAULT_VECTOR_DIMENSION: usize = 768;

/// Vector index over the menu catalog, backed by LanceDB.
pub struct MenuIndex {
    connection: Connection,
    table_name: String,
    vector_dimension: Option<usize>,
}

impl MenuIndex {
    /// Open (or create) the menu index under the configured base directory.
    #[inline]
    pub async fn new(config: &Config) -> Result<Self, FoodieError> {
        let db_path = config.index_dir();
        debug!("Initializing LanceDB at path: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FoodieError::Index(format!("Failed to create index directory: {}", e))
            })?;
        }

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to connect to LanceDB: {}", e)))?;

        let mut index = Self {
            connection,
            table_name: TABLE_NAME.to_string(),
            vector_dimension: None,
        };

        index.initialize_table().await?;

        info!("Menu index initialized successfully");
        Ok(index)
    }

    /// Initialize the menu table with the correct schema
    async fn initialize_table(&mut self) -> Result<(), FoodieError> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to list tables: {}", e)))?;

        if table_names.contains(&self.table_name) {
            debug!("Menu table already exists, detecting vector dimension");
            match self.detect_existing_vector_dimension().await {
                Ok(dim) => {
                    self.vector_dimension = Some(dim);
                    debug!("Detected existing vector dimension: {}", dim);
                }
                Err(e) => {
                    warn!(
                        "Could not detect vector dimension from existing table: {}",
                        e
                    );
                    self.vector_dimension = Some(DEFAULT_VECTOR_DIMENSION);
                }
            }
            return Ok(());
        }

        // The real dimension comes from the first batch of records; until
        // then the empty table carries the default.
        let schema = self.create_schema(DEFAULT_VECTOR_DIMENSION);

        self.connection
            .create_empty_table(&self.table_name, schema)
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to create table: {}", e)))?;

        self.vector_dimension = Some(DEFAULT_VECTOR_DIMENSION);
        info!("Menu table created");
        Ok(())
    }

    /// Detect vector dimension from existing table schema
    async fn detect_existing_vector_dimension(&self) -> Result<usize, FoodieError> {
        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to open existing table: {}", e)))?;

        let schema = table
            .schema()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to get table schema: {}", e)))?;

        for field in schema.fields() {
            if field.name() == "vector" {
                if let DataType::FixedSizeList(_, size) = field.data_type() {
                    return Ok(*size as usize);
                }
            }
        }

        Err(FoodieError::Index(
            "Could not find vector column or determine dimension".to_string(),
        ))
    }

    fn create_schema(&self, vector_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    vector_dim as i32,
                ),
                false,
            ),
            Field::new("name", DataType::Utf8, false),
            Field::new("description", DataType::Utf8, false),
            Field::new("ingredients", DataType::Utf8, false),
            Field::new("calories", DataType::Utf8, false),
            Field::new("price", DataType::Utf8, false),
            Field::new("allergens", DataType::Utf8, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("dietary_tags", DataType::Utf8, false),
            Field::new("document", DataType::Utf8, false),
        ]))
    }

    /// Replace the whole index with a fresh set of records.
    ///
    /// Returns the number of records written. An empty record set leaves
    /// a valid empty table behind.
    #[inline]
    pub async fn rebuild(&mut self, records: Vec<IndexRecord>) -> Result<usize, FoodieError> {
        let vector_dim = records
            .first()
            .map_or(DEFAULT_VECTOR_DIMENSION, |r| r.vector.len());

        info!(
            "Rebuilding menu index with {} records ({} dimensions)",
            records.len(),
            vector_dim
        );

        self.recreate_table_with_dimension(vector_dim).await?;
        self.vector_dimension = Some(vector_dim);

        let count = records.len();
        self.store_records_batch(records).await?;
        Ok(count)
    }

    /// Store a batch of index records, recreating the table if the vector
    /// dimension changed.
    #[inline]
    pub async fn store_records_batch(
        &mut self,
        records: Vec<IndexRecord>,
    ) -> Result<(), FoodieError> {
        if records.is_empty() {
            debug!("No records to store");
            return Ok(());
        }

        debug!("Storing batch of {} index records", records.len());

        let vector_dim = records[0].vector.len();
        if self.vector_dimension != Some(vector_dim) {
            info!(
                "Vector dimension changed from {:?} to {}, recreating table",
                self.vector_dimension, vector_dim
            );
            self.recreate_table_with_dimension(vector_dim).await?;
            self.vector_dimension = Some(vector_dim);
        }

        let record_batch = self.create_record_batch(&records)?;

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to open table: {}", e)))?;

        let schema = record_batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to insert records: {}", e)))?;

        info!("Stored {} index records", records.len());
        Ok(())
    }

    /// Recreate the table with a new vector dimension
    async fn recreate_table_with_dimension(&self, vector_dim: usize) -> Result<(), FoodieError> {
        self.drop_table_if_exists().await?;

        let schema = self.create_schema(vector_dim);
        self.connection
            .create_empty_table(&self.table_name, schema)
            .execute()
            .await
            .map_err(|e| {
                FoodieError::Index(format!("Failed to create table with new dimensions: {}", e))
            })?;

        debug!("Table recreated with {} dimensions", vector_dim);
        Ok(())
    }

    /// Create a RecordBatch from index records
    fn create_record_batch(&self, records: &[IndexRecord]) -> Result<RecordBatch, FoodieError> {
        let len = records.len();
        let vector_dim = self
            .vector_dimension
            .ok_or_else(|| FoodieError::Index("Vector dimension not set".to_string()))?;

        let mut ids = Vec::with_capacity(len);
        let mut names = Vec::with_capacity(len);
        let mut descriptions = Vec::with_capacity(len);
        let mut ingredients = Vec::with_capacity(len);
        let mut calories = Vec::with_capacity(len);
        let mut prices = Vec::with_capacity(len);
        let mut allergens = Vec::with_capacity(len);
        let mut categories = Vec::with_capacity(len);
        let mut dietary_tags = Vec::with_capacity(len);
        let mut documents = Vec::with_capacity(len);

        let mut flat_values = Vec::with_capacity(len * vector_dim);
        for record in records {
            ids.push(record.id.as_str());
            names.push(record.name.as_str());
            descriptions.push(record.description.as_str());
            ingredients.push(record.ingredients.as_str());
            calories.push(record.calories.as_str());
            prices.push(record.price.as_str());
            allergens.push(record.allergens.as_str());
            categories.push(record.category.as_str());
            dietary_tags.push(record.dietary_tags.as_str());
            documents.push(record.document.as_str());
            flat_values.extend_from_slice(&record.vector);
        }

        let schema = self.create_schema(vector_dim);

        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array =
            FixedSizeListArray::try_new(field, vector_dim as i32, Arc::new(values_array), None)
                .map_err(|e| {
                    FoodieError::Index(format!("Failed to create vector array: {}", e))
                })?;

        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(names)),
            Arc::new(StringArray::from(descriptions)),
            Arc::new(StringArray::from(ingredients)),
            Arc::new(StringArray::from(calories)),
            Arc::new(StringArray::from(prices)),
            Arc::new(StringArray::from(allergens)),
            Arc::new(StringArray::from(categories)),
            Arc::new(StringArray::from(dietary_tags)),
            Arc::new(StringArray::from(documents)),
        ];

        RecordBatch::try_new(schema, arrays)
            .map_err(|e| FoodieError::Index(format!("Failed to create record batch: {}", e)))
    }

    /// Search for the menu items most similar to a query vector.
    #[inline]
    pub async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<Candidate>, FoodieError> {
        debug!("Searching menu index with limit: {}", limit);

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| {
                FoodieError::IndexUnavailable(format!("Failed to open menu table: {}", e))
            })?;

        let results = table
            .vector_search(query_vector)
            .map_err(|e| {
                FoodieError::IndexUnavailable(format!("Failed to create vector search: {}", e))
            })?
            .column("vector")
            .limit(limit)
            .execute()
            .await
            .map_err(|e| {
                FoodieError::IndexUnavailable(format!("Failed to execute search: {}", e))
            })?;

        self.parse_search_results_stream(results).await
    }

    /// Parse search results from the LanceDB stream into candidates
    async fn parse_search_results_stream(
        &self,
        mut results: lancedb::arrow::SendableRecordBatchStream,
    ) -> Result<Vec<Candidate>, FoodieError> {
        let mut candidates = Vec::new();

        while let Some(batch_result) = results
            .try_next()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to read result stream: {}", e)))?
        {
            let parsed_batch = parse_search_batch(&batch_result)?;
            candidates.extend(parsed_batch);
        }

        debug!("Parsed {} candidates from stream", candidates.len());
        Ok(candidates)
    }

    /// Total number of indexed menu items
    #[inline]
    pub async fn count_items(&self) -> Result<u64, FoodieError> {
        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to open table: {}", e)))?;

        let count = table
            .count_rows(None)
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    /// Drop the menu table if it exists
    async fn drop_table_if_exists(&self) -> Result<(), FoodieError> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| FoodieError::Index(format!("Failed to list tables for drop: {}", e)))?;

        if table_names.contains(&self.table_name) {
            debug!("Dropping existing menu table");
            self.connection
                .drop_table(&self.table_name)
                .await
                .map_err(|e| FoodieError::Index(format!("Failed to drop table: {}", e)))?;
        }

        Ok(())
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, FoodieError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| FoodieError::Index(format!("Missing {} column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| FoodieError::Index(format!("Invalid {} column type", name)))
}

/// Parse a single record batch from search results
fn parse_search_batch(batch: &RecordBatch) -> Result<Vec<Candidate>, FoodieError> {
    let num_rows = batch.num_rows();
    let mut candidates = Vec::with_capacity(num_rows);

    let ids = string_column(batch, "id")?;
    let names = string_column(batch, "name")?;
    let descriptions = string_column(batch, "description")?;
    let ingredients = string_column(batch, "ingredients")?;
    let calories = string_column(batch, "calories")?;
    let prices = string_column(batch, "price")?;
    let allergens = string_column(batch, "allergens")?;
    let categories = string_column(batch, "category")?;
    let dietary_tags = string_column(batch, "dietary_tags")?;
    let documents = string_column(batch, "document")?;

    let distances = batch
        .column_by_name("_distance")
        .map(|col| col.as_any().downcast_ref::<Float32Array>());

    for row in 0..num_rows {
        let distance = distances
            .flatten()
            .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

        // Convert distance to similarity score (higher is better)
        let similarity = 1.0 - distance;

        candidates.push(Candidate {
            id: ids.value(row).to_string(),
            name: names.value(row).to_string(),
            description: descriptions.value(row).to_string(),
            ingredients: ingredients.value(row).to_string(),
            calories: calories.value(row).to_string(),
            price: prices.value(row).to_string(),
            allergens: allergens.value(row).to_string(),
            category: categories.value(row).to_string(),
            dietary_tags: dietary_tags.value(row).to_string(),
            document: documents.value(row).to_string(),
            similarity,
            distance,
        });
    }

    debug!("Parsed {} candidates", candidates.len());
    Ok(candidates)
}
