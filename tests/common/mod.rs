//! In-process mock of the storage REST gateway
//!
//! Speaks the same JSON CellSet dialect as the real gateway: base64 keys,
//! columns and values, scanners that hand out `batch` cells per read and
//! answer 204 once exhausted.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use parking_lot::Mutex;
use tokio::net::TcpListener;

use cellbridge::protocol::{CellData, CellSet, RowData, ScannerSpec, TableSchema};

type Columns = BTreeMap<Vec<u8>, Vec<u8>>;

#[derive(Default)]
struct Table {
    families: Vec<String>,
    rows: BTreeMap<Vec<u8>, Columns>,
}

struct OpenScanner {
    table: String,
    batch: usize,
    cells: Vec<(Vec<u8>, Vec<u8>, Vec<u8>)>,
    position: usize,
}

/// Shared state of the mock gateway
#[derive(Default)]
pub struct MockGateway {
    tables: Mutex<BTreeMap<String, Table>>,
    scanners: Mutex<HashMap<String, OpenScanner>>,
    next_scanner: AtomicU64,
    opened: Mutex<Vec<String>>,
    closed: Mutex<Vec<String>>,
    reads: AtomicU64,
    fail_scanner_reads: AtomicBool,
    omit_location: AtomicBool,
    read_delay_ms: AtomicU64,
    addr: Mutex<Option<SocketAddr>>,
}

impl MockGateway {
    /// Create a table directly, bypassing the schema endpoint
    pub fn create_table(&self, table: &str, family: &str) {
        self.tables.lock().insert(
            table.to_string(),
            Table {
                families: vec![family.to_string()],
                rows: BTreeMap::new(),
            },
        );
    }

    /// Write a raw cell, bypassing the row endpoint
    pub fn put_cell(&self, table: &str, key: &[u8], column: &[u8], value: &[u8]) {
        let mut tables = self.tables.lock();
        let table = tables.entry(table.to_string()).or_default();
        table
            .rows
            .entry(key.to_vec())
            .or_default()
            .insert(column.to_vec(), value.to_vec());
    }

    /// Raw value of one stored cell
    pub fn cell(&self, table: &str, key: &str, column: &str) -> Option<String> {
        let tables = self.tables.lock();
        let value = tables
            .get(table)?
            .rows
            .get(key.as_bytes())?
            .get(column.as_bytes())?;
        Some(String::from_utf8_lossy(value).into_owned())
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables.lock().get(table).map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.lock().contains_key(table)
    }

    pub fn families(&self, table: &str) -> Vec<String> {
        self.tables
            .lock()
            .get(table)
            .map(|t| t.families.clone())
            .unwrap_or_default()
    }

    /// Scanner ids handed out so far
    pub fn opened_scanners(&self) -> Vec<String> {
        self.opened.lock().clone()
    }

    /// Scanner ids released so far
    pub fn closed_scanners(&self) -> Vec<String> {
        self.closed.lock().clone()
    }

    /// Scanners opened and not yet released
    pub fn live_scanners(&self) -> usize {
        self.scanners.lock().len()
    }

    /// Number of scanner reads served (including the final 204)
    pub fn scanner_reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Make every scanner read answer 500
    pub fn fail_scanner_reads(&self, fail: bool) {
        self.fail_scanner_reads.store(fail, Ordering::SeqCst);
    }

    /// Delay every scanner read by `ms` milliseconds
    pub fn delay_scanner_reads(&self, ms: u64) {
        self.read_delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Open scanners without a Location header
    pub fn omit_location(&self, omit: bool) {
        self.omit_location.store(omit, Ordering::SeqCst);
    }
}

/// Start the mock on an ephemeral port; returns its base URL
pub async fn spawn_gateway() -> (String, Arc<MockGateway>) {
    let state = Arc::new(MockGateway::default());

    let router = Router::new()
        .route("/version/cluster", get(version))
        .route("/{table}/schema", post(create_schema))
        .route("/{table}/scanner", put(open_scanner))
        .route(
            "/{table}/scanner/{id}",
            get(read_scanner).delete(close_scanner),
        )
        .route(
            "/{table}/{row}",
            get(get_row).put(put_row).delete(delete_row),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    *state.addr.lock() = Some(addr);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

// =============================================================================
// Handlers
// =============================================================================

type Shared = State<Arc<MockGateway>>;

fn b64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

fn unb64(text: &str) -> Option<Vec<u8>> {
    STANDARD.decode(text).ok()
}

async fn version() -> impl IntoResponse {
    Json("2.5.8-mock")
}

async fn create_schema(
    State(gw): Shared,
    Path(table): Path<String>,
    Json(schema): Json<TableSchema>,
) -> Response {
    let mut tables = gw.tables.lock();
    if tables.contains_key(&table) {
        return (StatusCode::CONFLICT, format!("table {} exists", table)).into_response();
    }

    tables.insert(
        table,
        Table {
            families: schema.column_families.into_iter().map(|c| c.name).collect(),
            rows: BTreeMap::new(),
        },
    );
    StatusCode::CREATED.into_response()
}

async fn put_row(
    State(gw): Shared,
    Path((table, _row)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let Ok(set) = serde_json::from_slice::<CellSet>(&body) else {
        return (StatusCode::BAD_REQUEST, "bad cell set").into_response();
    };

    let mut tables = gw.tables.lock();
    let Some(table) = tables.get_mut(&table) else {
        return (StatusCode::NOT_FOUND, "no such table").into_response();
    };

    for row in set.rows {
        let Some(key) = unb64(&row.key) else {
            return (StatusCode::BAD_REQUEST, "bad key").into_response();
        };
        let columns = table.rows.entry(key).or_default();
        for cell in row.cells {
            let (Some(column), Some(value)) = (unb64(&cell.column), unb64(&cell.value)) else {
                return (StatusCode::BAD_REQUEST, "bad cell").into_response();
            };
            columns.insert(column, value);
        }
    }

    StatusCode::OK.into_response()
}

async fn get_row(State(gw): Shared, Path((table, row)): Path<(String, String)>) -> Response {
    let tables = gw.tables.lock();
    let Some(columns) = tables
        .get(&table)
        .and_then(|t| t.rows.get(row.as_bytes()))
    else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let set = CellSet {
        rows: vec![RowData {
            key: b64(row.as_bytes()),
            cells: columns
                .iter()
                .map(|(column, value)| CellData {
                    column: b64(column),
                    timestamp: Some(1_700_000_000_000),
                    value: b64(value),
                })
                .collect(),
        }],
    };
    Json(set).into_response()
}

async fn delete_row(State(gw): Shared, Path((table, row)): Path<(String, String)>) -> Response {
    let mut tables = gw.tables.lock();
    let Some(table) = tables.get_mut(&table) else {
        return (StatusCode::NOT_FOUND, "no such table").into_response();
    };
    table.rows.remove(row.as_bytes());
    StatusCode::OK.into_response()
}

async fn open_scanner(
    State(gw): Shared,
    Path(table): Path<String>,
    Json(spec): Json<ScannerSpec>,
) -> Response {
    let cells = {
        let tables = gw.tables.lock();
        let Some(t) = tables.get(&table) else {
            return (StatusCode::NOT_FOUND, "no such table").into_response();
        };
        t.rows
            .iter()
            .flat_map(|(key, columns)| {
                columns
                    .iter()
                    .map(move |(c, v)| (key.clone(), c.clone(), v.clone()))
            })
            .collect::<Vec<_>>()
    };

    let id = format!("{:x}", 0x1000 + gw.next_scanner.fetch_add(1, Ordering::SeqCst));
    gw.scanners.lock().insert(
        id.clone(),
        OpenScanner {
            table: table.clone(),
            batch: spec.batch.max(1) as usize,
            cells,
            position: 0,
        },
    );
    gw.opened.lock().push(id.clone());

    let mut headers = HeaderMap::new();
    if !gw.omit_location.load(Ordering::SeqCst) {
        let addr = gw.addr.lock().expect("mock address set");
        let location = format!("http://{}/{}/scanner/{}", addr, table, id);
        headers.insert(header::LOCATION, location.parse().unwrap());
    }
    (StatusCode::CREATED, headers).into_response()
}

async fn read_scanner(
    State(gw): Shared,
    Path((_table, id)): Path<(String, String)>,
) -> Response {
    gw.reads.fetch_add(1, Ordering::SeqCst);
    let delay = gw.read_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }
    if gw.fail_scanner_reads.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "region unavailable").into_response();
    }

    let mut scanners = gw.scanners.lock();
    let Some(scanner) = scanners.get_mut(&id) else {
        return (StatusCode::NOT_FOUND, "no such scanner").into_response();
    };

    let end = (scanner.position + scanner.batch).min(scanner.cells.len());
    if scanner.position >= end {
        return StatusCode::NO_CONTENT.into_response();
    }

    let mut rows: Vec<RowData> = Vec::new();
    for (key, column, value) in &scanner.cells[scanner.position..end] {
        let encoded_key = b64(key);
        let cell = CellData {
            column: b64(column),
            timestamp: Some(1_700_000_000_000),
            value: b64(value),
        };
        match rows.last_mut() {
            Some(last) if last.key == encoded_key => last.cells.push(cell),
            _ => rows.push(RowData {
                key: encoded_key,
                cells: vec![cell],
            }),
        }
    }
    scanner.position = end;

    Json(CellSet { rows }).into_response()
}

async fn close_scanner(
    State(gw): Shared,
    Path((_table, id)): Path<(String, String)>,
) -> Response {
    if gw.scanners.lock().remove(&id).is_none() {
        return (StatusCode::NOT_FOUND, "no such scanner").into_response();
    }
    gw.closed.lock().push(id);
    StatusCode::OK.into_response()
}
