//! The main entry point: a client for the Latvian meteorological and
//! hydrological open data on data.gov.lv.
//!
//! Every operation follows the same pipeline: build SQL, send it through the
//! configured [`Transport`], decode the response envelope, coerce the records
//! into a typed Polars frame and, for time series, pivot it into one column per
//! station and parameter.

use crate::error::LvMeteoError;
use crate::normalize::normalizer::records_to_table;
use crate::query::builder::{ensure_sql, select_all_sql, QuerySpec};
use crate::reshape::pivot::pivot_series;
use crate::transport::error::ApiError;
use crate::transport::{SqlTransport, Transport, TransportOptions};
use crate::types::datetime_input::DateTimeInput;
use crate::types::envelope::{ResponseEnvelope, ResultSet};
use crate::types::field_map::FieldMap;
use crate::types::observer::{LogObserver, PipelineObserver};
use crate::types::pivoted_table::SeriesTable;
use crate::types::resources::ResourceId;
use crate::types::selection::Selection;
use crate::types::typed_table::TypedTable;
use bon::bon;
use std::sync::Arc;

/// Client for the data.gov.lv datastore.
///
/// The client only holds configuration: a transport and a
/// [`PipelineObserver`]. It is cheap to share between tasks behind an `Arc`.
///
/// Create one with [`LvMeteo::new`] for the public endpoint over HTTP, or
/// [`LvMeteo::with_options`] to tune timeouts or switch to `curl`.
///
/// # Examples
///
/// ```rust,no_run
/// use lvmeteo::{LvMeteo, LvMeteoError, MeteoTable};
/// use chrono::{Duration, Utc};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), LvMeteoError> {
/// let client = LvMeteo::new();
/// let end = Utc::now();
///
/// let series = client
///     .series()
///     .table(MeteoTable::METEO_OPERATIONAL.table_name)
///     .stations(["RIGASLU", "RIAI99PA"])
///     .parameters("HTDRY")
///     .start(end - Duration::days(2))
///     .end(end)
///     .call()
///     .await?;
///
/// println!("{}", series.frame());
/// # Ok(())
/// # }
/// ```
pub struct LvMeteo<T: Transport = SqlTransport> {
    transport: T,
    observer: Arc<dyn PipelineObserver>,
}

impl LvMeteo<SqlTransport> {
    /// A client for the public endpoint with default [`TransportOptions`].
    pub fn new() -> Self {
        Self::with_options(TransportOptions::default())
    }

    pub fn with_options(options: TransportOptions) -> Self {
        Self::with_transport(SqlTransport::new(&options))
    }
}

impl Default for LvMeteo<SqlTransport> {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl<T: Transport> LvMeteo<T> {
    /// A client using a custom [`Transport`], logging through [`LogObserver`].
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replaces the observer that receives SQL statements and warnings.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches observations for the given stations and parameters and pivots
    /// them into a wide table.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.table(impl Into<String>)`: **Required.** Resource id of an observation
    ///   dataset, usually one of [`crate::MeteoTable`]'s `table_name`s.
    /// * `.stations(impl Into<Selection>)`: **Required.** One station id or a list.
    /// * `.parameters(impl Into<Selection>)`: **Required.** One parameter code
    ///   (`ABBREVIATION`) or a list.
    /// * `.start(impl Into<DateTimeInput>)` / `.end(..)`: **Required.** Inclusive
    ///   bounds; any chrono date/time type or an ISO 8601 string. Naive values
    ///   are taken as UTC.
    ///
    /// # Returns
    ///
    /// [`SeriesTable::Pivoted`] with a UTC `date` column and one `"station/param"`
    /// column per series. If the query matched nothing, the empty normalized
    /// table is returned as [`SeriesTable::Flat`].
    ///
    /// # Errors
    ///
    /// * [`LvMeteoError::Validation`] for empty inputs or a bad date range; no
    ///   request is made in that case. Also when the response holds two
    ///   different values for the same station, parameter and time.
    /// * [`LvMeteoError::Api`] for transport failures and unsuccessful responses.
    /// * [`LvMeteoError::DataNotFound`] if the response carries no result.
    #[builder]
    pub async fn series(
        &self,
        #[builder(into)] table: String,
        #[builder(into)] stations: Selection,
        #[builder(into)] parameters: Selection,
        #[builder(into)] start: DateTimeInput,
        #[builder(into)] end: DateTimeInput,
    ) -> Result<SeriesTable, LvMeteoError> {
        let query = QuerySpec::new(&table, stations, parameters, start, end)?;
        let result = self.query_result(&query.to_sql()).await?;
        let table = records_to_table(
            &result.fields,
            &result.records,
            Some(&FieldMap::observations()),
            self.observer.as_ref(),
        )?;
        pivot_series(table, self.observer.as_ref())
    }

    /// Downloads a whole resource, keeping and renaming the columns of
    /// `field_map`.
    ///
    /// With `.index_column(..)` the named (friendly) column must hold unique
    /// values; see [`TypedTable::with_index`].
    ///
    /// # Errors
    ///
    /// As for [`LvMeteo::series`], plus [`crate::ValidationError::DuplicateIndex`].
    #[builder]
    pub async fn table(
        &self,
        #[builder(into)] resource: String,
        field_map: FieldMap,
        #[builder(into)] index_column: Option<String>,
    ) -> Result<TypedTable, LvMeteoError> {
        let sql = select_all_sql(&resource)?;
        self.fetch_table(&sql, Some(&field_map), index_column.as_deref())
            .await
    }

    /// Runs an arbitrary SQL statement.
    ///
    /// Without a field map every column of the response is kept under its
    /// original name.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use lvmeteo::{LvMeteo, LvMeteoError, ResourceId};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), LvMeteoError> {
    /// let client = LvMeteo::new();
    /// let table = client
    ///     .sql()
    ///     .query(format!(r#"SELECT * FROM "{}" LIMIT 5"#, ResourceId::METEO_PARAMS))
    ///     .call()
    ///     .await?;
    /// assert!(table.height() <= 5);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn sql(
        &self,
        #[builder(into)] query: String,
        field_map: Option<FieldMap>,
        #[builder(into)] index_column: Option<String>,
    ) -> Result<TypedTable, LvMeteoError> {
        self.fetch_table(&query, field_map.as_ref(), index_column.as_deref())
            .await
    }

    /// Meteorological stations, indexed by `station_id`.
    pub async fn meteo_stations(&self) -> Result<TypedTable, LvMeteoError> {
        self.table()
            .resource(ResourceId::METEO_STATIONS)
            .field_map(FieldMap::stations())
            .index_column("station_id")
            .call()
            .await
    }

    /// Hydrological stations, indexed by `station_id`.
    pub async fn hydro_stations(&self) -> Result<TypedTable, LvMeteoError> {
        self.table()
            .resource(ResourceId::HYDRO_STATIONS)
            .field_map(FieldMap::stations())
            .index_column("station_id")
            .call()
            .await
    }

    /// Meteorological parameter descriptions, indexed by `param_id`.
    pub async fn meteo_params(&self) -> Result<TypedTable, LvMeteoError> {
        self.table()
            .resource(ResourceId::METEO_PARAMS)
            .field_map(FieldMap::parameters())
            .index_column("param_id")
            .call()
            .await
    }

    /// Hydrological parameter descriptions, indexed by `param_id`.
    pub async fn hydro_params(&self) -> Result<TypedTable, LvMeteoError> {
        self.table()
            .resource(ResourceId::HYDRO_PARAMS)
            .field_map(FieldMap::parameters())
            .index_column("param_id")
            .call()
            .await
    }
}

impl<T: Transport> LvMeteo<T> {
    async fn fetch_table(
        &self,
        sql: &str,
        field_map: Option<&FieldMap>,
        index_column: Option<&str>,
    ) -> Result<TypedTable, LvMeteoError> {
        let result = self.query_result(sql).await?;
        let table = records_to_table(
            &result.fields,
            &result.records,
            field_map,
            self.observer.as_ref(),
        )?;
        match index_column {
            Some(column) => table.with_index(column, self.observer.as_ref()),
            None => Ok(table),
        }
    }

    async fn query_result(&self, sql: &str) -> Result<ResultSet, LvMeteoError> {
        let sql = ensure_sql(sql)?;
        self.observer.on_sql(sql);

        let body = self.transport.execute(sql).await?;
        let envelope = ResponseEnvelope::from_value(body)?;
        if !envelope.success {
            return Err(ApiError::Unsuccessful(envelope.error_message().to_string()).into());
        }
        let result = envelope.result.ok_or_else(|| {
            LvMeteoError::DataNotFound("No data returned by the API".to_string())
        })?;

        self.observer.on_records(result.records.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::error::ValidationError;
    use crate::transport::stub::{serve_once, test_client, StubTransport};
    use crate::transport::HttpTransport;
    use crate::types::observer::{PipelineWarning, RecordingObserver};
    use crate::types::pivoted_table::SeriesKey;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::time::Duration;

    const EXPECTED_SQL: &str = r#"SELECT * FROM "T1" WHERE "STATION_ID" IN ('A') AND "ABBREVIATION" IN ('P1') AND "DATETIME" BETWEEN '2024-01-01T00:00:00' AND '2024-01-02T00:00:00'"#;

    fn observation_fields() -> Value {
        json!([
            {"id": "_id", "type": "int"},
            {"id": "STATION_ID", "type": "text"},
            {"id": "ABBREVIATION", "type": "text"},
            {"id": "DATETIME", "type": "timestamp"},
            {"id": "VALUE", "type": "numeric"}
        ])
    }

    fn client(response: Value) -> (LvMeteo<StubTransport>, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        let client =
            LvMeteo::with_transport(StubTransport::new(response)).with_observer(observer.clone());
        (client, observer)
    }

    async fn fetch_t1<T: Transport>(client: &LvMeteo<T>) -> Result<SeriesTable, LvMeteoError> {
        client
            .series()
            .table("T1")
            .stations(vec!["A"])
            .parameters(vec!["P1"])
            .start(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .end(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
            .call()
            .await
    }

    #[tokio::test]
    async fn series_are_pivoted_by_timestamp() -> Result<(), LvMeteoError> {
        let (client, observer) = client(json!({
            "success": true,
            "result": {
                "fields": observation_fields(),
                "records": [
                    {"_id": 2, "STATION_ID": "A", "ABBREVIATION": "P1",
                     "DATETIME": "2024-01-01T06:00:00", "VALUE": "6.0"},
                    {"_id": 1, "STATION_ID": "A", "ABBREVIATION": "P1",
                     "DATETIME": "2024-01-01T00:00:00", "VALUE": 5.0}
                ]
            }
        }));

        let pivoted = fetch_t1(&client)
            .await?
            .into_pivoted()
            .expect("pivoted table");

        assert_eq!(pivoted.height(), 2);
        assert_eq!(pivoted.keys(), [SeriesKey::new("A", "P1")]);
        assert_eq!(pivoted.frame.get_column_names(), ["date", "A/P1"]);
        assert_eq!(pivoted.series("A", "P1")?, Some(vec![Some(5.0), Some(6.0)]));
        assert_eq!(client.transport().statements(), [EXPECTED_SQL]);
        assert_eq!(observer.statements(), [EXPECTED_SQL]);
        Ok(())
    }

    #[tokio::test]
    async fn empty_records_are_not_an_error() -> Result<(), LvMeteoError> {
        let (client, observer) = client(json!({
            "success": true,
            "result": {"fields": observation_fields(), "records": []}
        }));

        let table = fetch_t1(&client).await?;

        assert!(table.is_empty());
        assert!(table.as_pivoted().is_none());
        assert_eq!(observer.warnings(), [PipelineWarning::EmptyResult]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_result_is_data_not_found() {
        let (client, _) = client(json!({"success": true}));
        let err = fetch_t1(&client).await.unwrap_err();
        assert!(err.is_data_not_found(), "{err:?}");
    }

    #[tokio::test]
    async fn unsuccessful_response_carries_server_message() {
        let (client, _) = client(json!({"success": false, "error": "relation does not exist"}));
        let err = fetch_t1(&client).await.unwrap_err();
        match err {
            LvMeteoError::Api(ApiError::Unsuccessful(message)) => {
                assert_eq!(message, "relation does not exist")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_an_api_error() {
        let (url, _request) = serve_once("500 Internal Server Error", "boom").await;
        let client = LvMeteo::with_transport(HttpTransport::with_client(
            test_client(),
            &url,
            Duration::from_secs(5),
        ))
        .with_observer(Arc::new(RecordingObserver::new()));

        let err = fetch_t1(&client).await.unwrap_err();

        assert!(err.is_api(), "{err:?}");
        assert!(err.to_string().contains("500"), "{err}");
    }

    #[tokio::test]
    async fn invalid_range_never_reaches_transport() {
        let (client, observer) = client(json!({"success": true}));
        let same = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let err = client
            .series()
            .table("T1")
            .stations("A")
            .parameters("P1")
            .start(same)
            .end(same)
            .call()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LvMeteoError::Validation(ValidationError::InvalidDateRange { .. })
        ));
        assert_eq!(client.transport().calls(), 0);
        assert!(observer.statements().is_empty());
    }

    #[tokio::test]
    async fn empty_inputs_never_reach_transport() {
        let (client, _) = client(json!({"success": true}));
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let no_table = client
            .series()
            .table("")
            .stations("A")
            .parameters("P1")
            .start(start)
            .end(end)
            .call()
            .await;
        let no_stations = client
            .series()
            .table("T1")
            .stations(Vec::<String>::new())
            .parameters("P1")
            .start(start)
            .end(end)
            .call()
            .await;
        let no_params = client
            .series()
            .table("T1")
            .stations("A")
            .parameters([""])
            .start(start)
            .end(end)
            .call()
            .await;

        for result in [no_table, no_stations, no_params] {
            assert!(result.unwrap_err().is_validation());
        }
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn empty_sql_is_rejected() {
        let (client, _) = client(json!({"success": true}));
        let err = client.sql().query("  ").call().await.unwrap_err();
        assert!(matches!(
            err,
            LvMeteoError::Validation(ValidationError::EmptySql)
        ));
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn raw_sql_keeps_response_columns() -> Result<(), LvMeteoError> {
        let (client, _) = client(json!({
            "success": true,
            "result": {
                "fields": [{"id": "n", "type": "numeric"}],
                "records": [{"n": 1}, {"n": 2}]
            }
        }));

        let table = client.sql().query("SELECT 1 AS n").call().await?;

        assert_eq!(table.column_names(), ["n"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.index_column(), None);
        Ok(())
    }

    #[tokio::test]
    async fn stations_are_indexed_by_id() -> Result<(), LvMeteoError> {
        let (client, observer) = client(json!({
            "success": true,
            "result": {
                "fields": [
                    {"id": "STATION_ID", "type": "text"},
                    {"id": "NAME", "type": "text"},
                    {"id": "GEOGR1", "type": "numeric"},
                    {"id": "GEOGR2", "type": "numeric"}
                ],
                "records": [
                    {"STATION_ID": "RIGASLU", "NAME": "Rīga", "GEOGR1": 24.1, "GEOGR2": 56.95},
                    {"STATION_ID": "RIAI99PA", "NAME": "Ainaži", "GEOGR1": 24.35, "GEOGR2": 57.87}
                ]
            }
        }));

        let stations = client.meteo_stations().await?;

        assert_eq!(
            client.transport().statements(),
            [format!(r#"SELECT * FROM "{}""#, ResourceId::METEO_STATIONS)]
        );
        assert_eq!(stations.index_column(), Some("station_id"));
        let station_map = FieldMap::stations();
        assert_eq!(
            stations.column_names(),
            station_map.friendly_names().collect::<Vec<_>>()
        );
        let riga = stations.lookup("RIGASLU")?.expect("row for RIGASLU");
        assert_eq!(riga.column("latitude")?.f64()?.get(0), Some(56.95));
        assert_eq!(
            observer.warnings().len(),
            station_map.len() - 4,
            "every unmapped station column warns once"
        );
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_parameter_ids_are_rejected() {
        let (client, _) = client(json!({
            "success": true,
            "result": {
                "fields": [{"id": "ABBREVIATION", "type": "text"}],
                "records": [{"ABBREVIATION": "HTDRY"}, {"ABBREVIATION": "HTDRY"}]
            }
        }));

        let err = client.hydro_params().await.unwrap_err();
        assert!(matches!(
            err,
            LvMeteoError::Validation(ValidationError::DuplicateIndex { .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires network access to data.gov.lv"]
    async fn live_parameter_catalogue() -> Result<(), LvMeteoError> {
        let client = LvMeteo::new();
        let params = client.meteo_params().await?;
        assert!(params.height() > 0);
        assert_eq!(params.index_column(), Some("param_id"));
        Ok(())
    }
}
