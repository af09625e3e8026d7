//! Services for the people and companies the warehouse deals with:
//! localities, sellers, buyers, carriers and employees.

use std::sync::Arc;

use tracing::{debug, info};
use wareflow_core::validation::{
    validate_buyer, validate_carrier, validate_employee, validate_locality, validate_seller,
};
use wareflow_core::{
    Buyer, BuyerPatch, BuyerPurchaseOrdersReport, Carrier, DomainResult, Employee,
    EmployeeInboundOrdersReport, EmployeePatch, Locality, LocalityCarriersReport,
    LocalitySellersReport, NaturalKey, Seller, SellerPatch,
};
use wareflow_db::{
    BuyerRepository, CarrierRepository, EmployeeRepository, LocalityRepository, SellerRepository,
};

use super::{ensure_unclaimed, require_reference, WarehouseService};

// =============================================================================
// Localities
// =============================================================================

pub struct LocalityService {
    repo: Arc<dyn LocalityRepository>,
}

impl LocalityService {
    pub fn new(repo: Arc<dyn LocalityRepository>) -> Self {
        LocalityService { repo }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Locality>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Locality> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Creates a locality.
    ///
    /// There is no pre-probe: the (name, province, country) constraint in the
    /// store reports a duplicate as `Conflict(locality)`.
    pub async fn create(&self, mut locality: Locality) -> DomainResult<Locality> {
        validate_locality(&locality)?;
        locality.id = self.repo.save(&locality).await?;
        info!(id = locality.id, name = %locality.locality_name, "Locality created");
        Ok(locality)
    }

    pub async fn update(&self, id: i64, mut locality: Locality) -> DomainResult<Locality> {
        self.get_by_id(id).await?;
        locality.id = id;
        validate_locality(&locality)?;
        self.repo.update(&locality).await?;
        Ok(locality)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(id, "Locality deleted");
        Ok(())
    }

    pub async fn report_sellers(&self, id: Option<i64>) -> DomainResult<Vec<LocalitySellersReport>> {
        Ok(self.repo.report_sellers(id).await?)
    }

    pub async fn report_carriers(
        &self,
        id: Option<i64>,
    ) -> DomainResult<Vec<LocalityCarriersReport>> {
        Ok(self.repo.report_carriers(id).await?)
    }
}

// =============================================================================
// Sellers
// =============================================================================

pub struct SellerService {
    repo: Arc<dyn SellerRepository>,
    localities: Arc<LocalityService>,
}

impl SellerService {
    pub fn new(repo: Arc<dyn SellerRepository>, localities: Arc<LocalityService>) -> Self {
        SellerService { repo, localities }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Seller>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Seller> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, mut seller: Seller) -> DomainResult<Seller> {
        validate_seller(&seller)?;
        require_reference(self.localities.get_by_id(seller.locality_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_cid(seller.cid).await?,
            None,
            NaturalKey::SellerCid,
        )?;

        seller.id = self.repo.save(&seller).await?;
        info!(id = seller.id, cid = seller.cid, "Seller created");
        Ok(seller)
    }

    /// Applies a patch. An empty patch returns the stored seller untouched.
    pub async fn update(&self, id: i64, patch: SellerPatch) -> DomainResult<Seller> {
        let current = self.get_by_id(id).await?;
        if patch.is_empty() {
            debug!(id, "Empty seller patch");
            return Ok(current);
        }

        let mut seller = current.clone();
        patch.apply_to(&mut seller);
        validate_seller(&seller)?;

        if seller.locality_id != current.locality_id {
            require_reference(self.localities.get_by_id(seller.locality_id)).await?;
        }
        if seller.cid != current.cid {
            ensure_unclaimed(
                self.repo.find_by_cid(seller.cid).await?,
                Some(id),
                NaturalKey::SellerCid,
            )?;
        }

        self.repo.update(&seller).await?;
        Ok(seller)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(id, "Seller deleted");
        Ok(())
    }
}

// =============================================================================
// Buyers
// =============================================================================

pub struct BuyerService {
    repo: Arc<dyn BuyerRepository>,
}

impl BuyerService {
    pub fn new(repo: Arc<dyn BuyerRepository>) -> Self {
        BuyerService { repo }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Buyer>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Buyer> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, mut buyer: Buyer) -> DomainResult<Buyer> {
        validate_buyer(&buyer)?;
        ensure_unclaimed(
            self.repo.find_by_card_number_id(&buyer.card_number_id).await?,
            None,
            NaturalKey::BuyerCardNumberId,
        )?;

        buyer.id = self.repo.save(&buyer).await?;
        info!(id = buyer.id, "Buyer created");
        Ok(buyer)
    }

    pub async fn update(&self, id: i64, patch: BuyerPatch) -> DomainResult<Buyer> {
        let current = self.get_by_id(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut buyer = current.clone();
        patch.apply_to(&mut buyer);
        validate_buyer(&buyer)?;

        if buyer.card_number_id != current.card_number_id {
            ensure_unclaimed(
                self.repo.find_by_card_number_id(&buyer.card_number_id).await?,
                Some(id),
                NaturalKey::BuyerCardNumberId,
            )?;
        }

        self.repo.update(&buyer).await?;
        Ok(buyer)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(id, "Buyer deleted");
        Ok(())
    }

    pub async fn report_purchase_orders(
        &self,
        id: Option<i64>,
    ) -> DomainResult<Vec<BuyerPurchaseOrdersReport>> {
        Ok(self.repo.report_purchase_orders(id).await?)
    }
}

// =============================================================================
// Carriers
// =============================================================================

pub struct CarrierService {
    repo: Arc<dyn CarrierRepository>,
    localities: Arc<LocalityService>,
}

impl CarrierService {
    pub fn new(repo: Arc<dyn CarrierRepository>, localities: Arc<LocalityService>) -> Self {
        CarrierService { repo, localities }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Carrier>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Carrier> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, carrier: Carrier) -> DomainResult<Carrier> {
        self.store(carrier, None).await
    }

    /// Replaces every field of carrier `id`.
    pub async fn update(&self, id: i64, carrier: Carrier) -> DomainResult<Carrier> {
        self.get_by_id(id).await?;
        self.store(carrier, Some(id)).await
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }

    async fn store(&self, mut carrier: Carrier, id: Option<i64>) -> DomainResult<Carrier> {
        validate_carrier(&carrier)?;
        require_reference(self.localities.get_by_id(carrier.locality_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_cid(&carrier.cid).await?,
            id,
            NaturalKey::CarrierCid,
        )?;

        match id {
            Some(id) => {
                carrier.id = id;
                self.repo.update(&carrier).await?;
            }
            None => {
                carrier.id = self.repo.save(&carrier).await?;
                info!(id = carrier.id, cid = %carrier.cid, "Carrier created");
            }
        }
        Ok(carrier)
    }
}

// =============================================================================
// Employees
// =============================================================================

pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
    warehouses: Arc<WarehouseService>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>, warehouses: Arc<WarehouseService>) -> Self {
        EmployeeService { repo, warehouses }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Employee>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Employee> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, mut employee: Employee) -> DomainResult<Employee> {
        validate_employee(&employee)?;
        require_reference(self.warehouses.get_by_id(employee.warehouse_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_card_number_id(&employee.card_number_id).await?,
            None,
            NaturalKey::EmployeeCardNumberId,
        )?;

        employee.id = self.repo.save(&employee).await?;
        info!(id = employee.id, "Employee created");
        Ok(employee)
    }

    pub async fn update(&self, id: i64, patch: EmployeePatch) -> DomainResult<Employee> {
        let current = self.get_by_id(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut employee = current.clone();
        patch.apply_to(&mut employee);
        validate_employee(&employee)?;

        if employee.warehouse_id != current.warehouse_id {
            require_reference(self.warehouses.get_by_id(employee.warehouse_id)).await?;
        }
        if employee.card_number_id != current.card_number_id {
            ensure_unclaimed(
                self.repo.find_by_card_number_id(&employee.card_number_id).await?,
                Some(id),
                NaturalKey::EmployeeCardNumberId,
            )?;
        }

        self.repo.update(&employee).await?;
        Ok(employee)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(id, "Employee deleted");
        Ok(())
    }

    pub async fn report_inbound_orders(
        &self,
        id: Option<i64>,
    ) -> DomainResult<Vec<EmployeeInboundOrdersReport>> {
        Ok(self.repo.report_inbound_orders(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::services::test_support::{locality, memory_services, seller};
    use crate::services::Services;
    use wareflow_core::{DomainError, EntityKind, NaturalKey, SellerPatch};
    use wareflow_db::{Database, DbConfig};

    /// Races `attempts` creates of the same cid; returns (created, conflicts).
    async fn race_seller_cid(services: &Services, attempts: usize) -> (usize, usize) {
        let locality_id = services.localities.create(locality("Palermo")).await.unwrap().id;

        let handles: Vec<_> = (0..attempts)
            .map(|_| {
                let sellers = services.sellers.clone();
                tokio::spawn(async move { sellers.create(seller(42, locality_id)).await })
            })
            .collect();

        let (mut created, mut conflicts) = (0, 0);
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(DomainError::Conflict(NaturalKey::SellerCid)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        (created, conflicts)
    }

    #[tokio::test]
    async fn test_seller_create_checks_locality_then_cid() {
        let services = memory_services();

        let err = services.sellers.create(seller(1, 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(EntityKind::Locality)));

        let loc = services.localities.create(locality("Palermo")).await.unwrap();
        let created = services.sellers.create(seller(1, loc.id)).await.unwrap();
        assert!(created.id >= 1);

        let err = services.sellers.create(seller(1, loc.id)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(NaturalKey::SellerCid)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_with_same_cid_memory() {
        let services = memory_services();

        assert_eq!(race_seller_cid(&services, 16).await, (1, 15));
        assert_eq!(services.sellers.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_with_same_cid_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("race.db")).max_connections(8))
            .await
            .unwrap();
        let services = Services::new(db.repositories());

        assert_eq!(race_seller_cid(&services, 16).await, (1, 15));
        assert_eq!(services.sellers.get_all().await.unwrap().len(), 1);
        db.close().await;
    }

    #[tokio::test]
    async fn test_seller_patch_keeps_unmentioned_fields() {
        let services = memory_services();
        let loc = services.localities.create(locality("Palermo")).await.unwrap();
        let created = services.sellers.create(seller(7, loc.id)).await.unwrap();

        let patch = SellerPatch {
            company_name: Some("Renamed".into()),
            address: Some("   ".into()),
            ..Default::default()
        };
        let patched = services.sellers.update(created.id, patch.clone()).await.unwrap();
        assert_eq!(patched.company_name, "Renamed");
        assert_eq!(patched.address, created.address);
        assert_eq!(patched.cid, 7);

        let again = services.sellers.update(created.id, patch).await.unwrap();
        assert_eq!(again, patched);
    }

    #[tokio::test]
    async fn test_seller_patch_to_taken_cid_conflicts() {
        let services = memory_services();
        let loc = services.localities.create(locality("Palermo")).await.unwrap();
        services.sellers.create(seller(1, loc.id)).await.unwrap();
        let second = services.sellers.create(seller(2, loc.id)).await.unwrap();

        let patch = SellerPatch {
            cid: Some(1),
            ..Default::default()
        };
        let err = services.sellers.update(second.id, patch).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(NaturalKey::SellerCid)));
    }

    #[tokio::test]
    async fn test_duplicate_locality_is_reported_by_the_store() {
        let services = memory_services();
        services.localities.create(locality("Palermo")).await.unwrap();

        let err = services.localities.create(locality("Palermo")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(NaturalKey::Locality)));
    }

    #[tokio::test]
    async fn test_locality_with_sellers_cannot_be_deleted() {
        let services = memory_services();
        let loc = services.localities.create(locality("Palermo")).await.unwrap();
        services.sellers.create(seller(1, loc.id)).await.unwrap();

        let err = services.localities.delete(loc.id).await.unwrap_err();
        assert!(matches!(err, DomainError::ReferencedByChild(EntityKind::Locality)));

        let err = services.localities.delete(999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(EntityKind::Locality)));
    }
}
