//! Warehouse and section services.

use std::sync::Arc;

use tracing::info;
use wareflow_core::validation::{validate_section, validate_warehouse};
use wareflow_core::{
    DomainResult, NaturalKey, Section, SectionPatch, SectionProductsReport, Warehouse,
    WarehousePatch,
};
use wareflow_db::{SectionRepository, WarehouseRepository};

use super::{ensure_unclaimed, require_reference, ProductTypeService};

// =============================================================================
// Warehouses
// =============================================================================

pub struct WarehouseService {
    repo: Arc<dyn WarehouseRepository>,
}

impl WarehouseService {
    pub fn new(repo: Arc<dyn WarehouseRepository>) -> Self {
        WarehouseService { repo }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Warehouse>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Warehouse> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, mut warehouse: Warehouse) -> DomainResult<Warehouse> {
        validate_warehouse(&warehouse)?;
        ensure_unclaimed(
            self.repo.find_by_code(&warehouse.warehouse_code).await?,
            None,
            NaturalKey::WarehouseCode,
        )?;

        warehouse.id = self.repo.save(&warehouse).await?;
        info!(id = warehouse.id, code = %warehouse.warehouse_code, "Warehouse created");
        Ok(warehouse)
    }

    pub async fn update(&self, id: i64, patch: WarehousePatch) -> DomainResult<Warehouse> {
        let current = self.get_by_id(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut warehouse = current.clone();
        patch.apply_to(&mut warehouse);
        validate_warehouse(&warehouse)?;

        if warehouse.warehouse_code != current.warehouse_code {
            ensure_unclaimed(
                self.repo.find_by_code(&warehouse.warehouse_code).await?,
                Some(id),
                NaturalKey::WarehouseCode,
            )?;
        }

        self.repo.update(&warehouse).await?;
        Ok(warehouse)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(id, "Warehouse deleted");
        Ok(())
    }
}

// =============================================================================
// Sections
// =============================================================================

pub struct SectionService {
    repo: Arc<dyn SectionRepository>,
    warehouses: Arc<WarehouseService>,
    product_types: Arc<ProductTypeService>,
}

impl SectionService {
    pub fn new(
        repo: Arc<dyn SectionRepository>,
        warehouses: Arc<WarehouseService>,
        product_types: Arc<ProductTypeService>,
    ) -> Self {
        SectionService {
            repo,
            warehouses,
            product_types,
        }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Section>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Section> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Creates a section.
    ///
    /// References are checked warehouse first, then product type.
    pub async fn create(&self, mut section: Section) -> DomainResult<Section> {
        validate_section(&section)?;
        require_reference(self.warehouses.get_by_id(section.warehouse_id)).await?;
        require_reference(self.product_types.get_by_id(section.product_type_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_section_number(section.section_number).await?,
            None,
            NaturalKey::SectionNumber,
        )?;

        section.id = self.repo.save(&section).await?;
        info!(id = section.id, number = section.section_number, "Section created");
        Ok(section)
    }

    pub async fn update(&self, id: i64, patch: SectionPatch) -> DomainResult<Section> {
        let current = self.get_by_id(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut section = current.clone();
        patch.apply_to(&mut section);
        validate_section(&section)?;

        if section.warehouse_id != current.warehouse_id {
            require_reference(self.warehouses.get_by_id(section.warehouse_id)).await?;
        }
        if section.product_type_id != current.product_type_id {
            require_reference(self.product_types.get_by_id(section.product_type_id)).await?;
        }
        if section.section_number != current.section_number {
            ensure_unclaimed(
                self.repo.find_by_section_number(section.section_number).await?,
                Some(id),
                NaturalKey::SectionNumber,
            )?;
        }

        self.repo.update(&section).await?;
        Ok(section)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(id, "Section deleted");
        Ok(())
    }

    /// Sum of batch quantities per section.
    pub async fn report_products(
        &self,
        id: Option<i64>,
    ) -> DomainResult<Vec<SectionProductsReport>> {
        Ok(self.repo.report_products(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::{memory_services, product_type, section, warehouse};
    use wareflow_core::{DomainError, EntityKind, NaturalKey, SectionPatch, WarehousePatch};

    #[tokio::test]
    async fn test_section_references_are_checked_in_order() {
        let services = memory_services();

        let err = services.sections.create(section(1, 5, 5)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(EntityKind::Warehouse)));

        let w = services.warehouses.create(warehouse("W1")).await.unwrap();
        let err = services.sections.create(section(1, w.id, 5)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(EntityKind::ProductType)));
    }

    #[tokio::test]
    async fn test_section_patch_revalidates_capacity() {
        let services = memory_services();
        let w = services.warehouses.create(warehouse("W1")).await.unwrap();
        let t = services.product_types.create(product_type("Frozen")).await.unwrap();
        let s = services.sections.create(section(3, w.id, t.id)).await.unwrap();

        let patch = SectionPatch {
            current_capacity: Some(s.maximum_capacity + 1),
            ..Default::default()
        };
        let err = services.sections.update(s.id, patch).await.unwrap_err();
        match err {
            DomainError::Validation(errors) => assert_eq!(errors.fields(), vec!["current_capacity"]),
            other => panic!("unexpected error: {other:?}"),
        }

        // Nothing was written.
        assert_eq!(services.sections.get_by_id(s.id).await.unwrap(), s);
    }

    #[tokio::test]
    async fn test_empty_warehouse_patch_returns_pre_image() {
        let services = memory_services();
        let w = services.warehouses.create(warehouse("W1")).await.unwrap();

        let same = services
            .warehouses
            .update(w.id, WarehousePatch::default())
            .await
            .unwrap();
        assert_eq!(same, w);
    }

    #[tokio::test]
    async fn test_warehouse_code_reuse_conflicts() {
        let services = memory_services();
        services.warehouses.create(warehouse("W1")).await.unwrap();

        let err = services.warehouses.create(warehouse("W1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(NaturalKey::WarehouseCode)));
    }
}
