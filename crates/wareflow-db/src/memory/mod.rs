//! # In-Memory Store
//!
//! Map-backed implementation of the repository contracts, seeded from the
//! JSON seed set.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MemoryStore (Clone = shared handle)                                   │
//! │  └── Arc<RwLock<Tables>>                                               │
//! │       ├── sellers:  Table<Seller>   { rows: BTreeMap<id, row>, next_id }│
//! │       ├── buyers:   Table<Buyer>                                       │
//! │       └── ...                                                          │
//! │                                                                         │
//! │  save / update:  one write lock                                        │
//! │    ├── every reference resolves?      else InvalidReference            │
//! │    ├── natural key free?              else UniqueViolation             │
//! │    └── write                                                           │
//! │  delete:         one write lock                                        │
//! │    ├── row exists?                    else NotFound                    │
//! │    ├── no child points at it?         else ReferencedByChild           │
//! │    └── remove                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks and writes happen under the same lock, so two racing creates of one
//! natural key end as one success and one `UniqueViolation`, exactly like
//! the SQLite constraints. Locks are never held across an `.await`.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use wareflow_core::{
    Buyer, Carrier, Employee, Entity, EntityKind, InboundOrder, Locality, NaturalKey, Product,
    ProductBatch, ProductRecord, ProductType, PurchaseOrder, Section, Seller, Warehouse,
};

use crate::error::{DbError, DbResult};
use crate::repository::{Repositories, Repository};
use crate::seed::SeedSet;

mod entities;

// =============================================================================
// Table
// =============================================================================

/// One entity's rows, ordered by id.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Entity> Table<T> {
    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Rows in ascending id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Whether a row other than `exclude` satisfies `pred`.
    pub fn any_other(&self, exclude: Option<i64>, pred: impl Fn(&T) -> bool) -> bool {
        self.rows
            .values()
            .any(|row| Some(row.id()) != exclude && pred(row))
    }

    /// Inserts with a fresh id.
    fn insert_new(&mut self, mut row: T) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        row.set_id(id);
        self.rows.insert(id, row);
        id
    }

    /// Inserts keeping the row's id; later ids continue after the highest one.
    fn insert_seeded(&mut self, row: T) {
        let id = row.id();
        self.next_id = self.next_id.max(id + 1);
        self.rows.insert(id, row);
    }

    fn load(&mut self, rows: Vec<T>) {
        for row in rows {
            self.insert_seeded(row);
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Every table of the store.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub(crate) sellers: Table<Seller>,
    pub(crate) buyers: Table<Buyer>,
    pub(crate) employees: Table<Employee>,
    pub(crate) warehouses: Table<Warehouse>,
    pub(crate) sections: Table<Section>,
    pub(crate) product_types: Table<ProductType>,
    pub(crate) products: Table<Product>,
    pub(crate) product_records: Table<ProductRecord>,
    pub(crate) product_batches: Table<ProductBatch>,
    pub(crate) localities: Table<Locality>,
    pub(crate) carriers: Table<Carrier>,
    pub(crate) inbound_orders: Table<InboundOrder>,
    pub(crate) purchase_orders: Table<PurchaseOrder>,
}

/// How an entity lives in the map store.
///
/// The three checks mirror the SQLite UNIQUE and FOREIGN KEY constraints.
pub trait MemoryEntity: Entity + std::fmt::Debug {
    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// The natural key this row would collide on, ignoring row `exclude`.
    fn conflict(&self, _tables: &Tables, _exclude: Option<i64>) -> Option<NaturalKey> {
        None
    }

    /// The first reference that does not resolve.
    fn missing_reference(&self, _tables: &Tables) -> Option<EntityKind> {
        None
    }

    /// Whether any row of another table points at `id`.
    fn has_children(_id: i64, _tables: &Tables) -> bool {
        false
    }
}

fn check_write<T: MemoryEntity>(entity: &T, tables: &Tables, exclude: Option<i64>) -> DbResult<()> {
    if let Some(entity) = entity.missing_reference(tables) {
        return Err(DbError::InvalidReference { entity });
    }
    if let Some(key) = entity.conflict(tables, exclude) {
        return Err(DbError::duplicate(key));
    }
    Ok(())
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle to the in-memory tables.
///
/// ## Usage
/// ```rust,ignore
/// let store = MemoryStore::from_seed(SeedSet::load("db")?);
/// let repos = Repositories::memory(&store);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding every seeded row with its original id.
    pub fn from_seed(seed: SeedSet) -> Self {
        let mut tables = Tables::default();
        tables.localities.load(seed.localities);
        tables.sellers.load(seed.sellers);
        tables.buyers.load(seed.buyers);
        tables.warehouses.load(seed.warehouses);
        tables.employees.load(seed.employees);
        tables.product_types.load(seed.product_types);
        tables.sections.load(seed.sections);
        tables.products.load(seed.products);
        tables.product_records.load(seed.product_records);
        tables.product_batches.load(seed.product_batches);
        tables.carriers.load(seed.carriers);
        tables.inbound_orders.load(seed.inbound_orders);
        tables.purchase_orders.load(seed.purchase_orders);

        MemoryStore {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }
}

// =============================================================================
// Generic Repository
// =============================================================================

/// Map-backed repository for any entity.
#[derive(Debug)]
pub struct MemoryRepository<T> {
    store: MemoryStore,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        MemoryRepository::new(self.store.clone())
    }
}

impl<T> MemoryRepository<T> {
    pub fn new(store: MemoryStore) -> Self {
        MemoryRepository {
            store,
            _entity: PhantomData,
        }
    }

    pub(crate) fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl<T: MemoryEntity> MemoryRepository<T> {
    /// First row matching `pred`.
    pub(crate) fn find_first(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let tables = self.store.read();
        let found = T::table(&tables).values().find(|row| pred(*row)).cloned();
        found
    }
}

#[async_trait]
impl<T: MemoryEntity> Repository<T> for MemoryRepository<T> {
    async fn find_all(&self) -> DbResult<Vec<T>> {
        let tables = self.store.read();
        Ok(T::table(&tables).values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> DbResult<T> {
        let tables = self.store.read();
        T::table(&tables)
            .get(id)
            .cloned()
            .ok_or(DbError::not_found(T::KIND, id))
    }

    async fn save(&self, entity: &T) -> DbResult<i64> {
        let mut tables = self.store.write();
        check_write(entity, &tables, None)?;
        let id = T::table_mut(&mut tables).insert_new(entity.clone());
        debug!(entity = %T::KIND, id, "Inserted row");
        Ok(id)
    }

    async fn update(&self, entity: &T) -> DbResult<()> {
        let id = entity.id();
        let mut tables = self.store.write();
        if !T::table(&tables).contains(id) {
            return Err(DbError::not_found(T::KIND, id));
        }
        check_write(entity, &tables, Some(id))?;
        T::table_mut(&mut tables).rows.insert(id, entity.clone());
        debug!(entity = %T::KIND, id, "Updated row");
        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tables = self.store.write();
        if !T::table(&tables).contains(id) {
            return Err(DbError::not_found(T::KIND, id));
        }
        if T::has_children(id, &tables) {
            return Err(DbError::ReferencedByChild { entity: T::KIND });
        }
        T::table_mut(&mut tables).rows.remove(&id);
        debug!(entity = %T::KIND, id, "Deleted row");
        Ok(())
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Builds one report row per parent.
///
/// `build` returns `(joined_rows, report_row)`. Without an id filter, parents
/// with no joined rows are dropped unless `keep_empty` (left-join semantics).
/// With an id filter the parent is always reported, and a missing parent is
/// `NotFound`.
pub(crate) fn aggregate<P, R>(
    tables: &Tables,
    id: Option<i64>,
    keep_empty: bool,
    build: impl Fn(&P) -> (usize, R),
) -> DbResult<Vec<R>>
where
    P: MemoryEntity,
{
    let table = P::table(tables);
    match id {
        Some(id) => {
            let parent = table.get(id).ok_or(DbError::not_found(P::KIND, id))?;
            Ok(vec![build(parent).1])
        }
        None => Ok(table
            .values()
            .map(&build)
            .filter(|(joined, _)| keep_empty || *joined > 0)
            .map(|(_, row)| row)
            .collect()),
    }
}

// =============================================================================
// Bundle
// =============================================================================

impl Repositories {
    /// Every repository backed by the same in-memory store.
    pub fn memory(store: &MemoryStore) -> Self {
        Repositories {
            sellers: Arc::new(MemoryRepository::<Seller>::new(store.clone())),
            buyers: Arc::new(MemoryRepository::<Buyer>::new(store.clone())),
            employees: Arc::new(MemoryRepository::<Employee>::new(store.clone())),
            warehouses: Arc::new(MemoryRepository::<Warehouse>::new(store.clone())),
            sections: Arc::new(MemoryRepository::<Section>::new(store.clone())),
            product_types: Arc::new(MemoryRepository::<ProductType>::new(store.clone())),
            products: Arc::new(MemoryRepository::<Product>::new(store.clone())),
            product_records: Arc::new(MemoryRepository::<ProductRecord>::new(store.clone())),
            product_batches: Arc::new(MemoryRepository::<ProductBatch>::new(store.clone())),
            localities: Arc::new(MemoryRepository::<Locality>::new(store.clone())),
            carriers: Arc::new(MemoryRepository::<Carrier>::new(store.clone())),
            inbound_orders: Arc::new(MemoryRepository::<InboundOrder>::new(store.clone())),
            purchase_orders: Arc::new(MemoryRepository::<PurchaseOrder>::new(store.clone())),
        }
    }
}
