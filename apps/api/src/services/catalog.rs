//! Catalog services: product types, products, their price records and the
//! physical batches stored in sections.

use std::sync::Arc;

use tracing::info;
use wareflow_core::validation::{
    validate_product, validate_product_batch, validate_product_record, validate_product_type,
};
use wareflow_core::{
    DomainResult, NaturalKey, Product, ProductBatch, ProductPatch, ProductRecord,
    ProductRecordsReport, ProductType,
};
use wareflow_db::{
    ProductBatchRepository, ProductRecordRepository, ProductRepository, ProductTypeRepository,
};

use super::{ensure_unclaimed, require_reference, SectionService, SellerService};

// =============================================================================
// Product Types
// =============================================================================

pub struct ProductTypeService {
    repo: Arc<dyn ProductTypeRepository>,
}

impl ProductTypeService {
    pub fn new(repo: Arc<dyn ProductTypeRepository>) -> Self {
        ProductTypeService { repo }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<ProductType>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<ProductType> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, mut product_type: ProductType) -> DomainResult<ProductType> {
        validate_product_type(&product_type)?;
        product_type.id = self.repo.save(&product_type).await?;
        info!(id = product_type.id, "Product type created");
        Ok(product_type)
    }

    pub async fn update(&self, id: i64, mut product_type: ProductType) -> DomainResult<ProductType> {
        self.get_by_id(id).await?;
        product_type.id = id;
        validate_product_type(&product_type)?;
        self.repo.update(&product_type).await?;
        Ok(product_type)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }
}

// =============================================================================
// Products
// =============================================================================

pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    sellers: Arc<SellerService>,
    product_types: Arc<ProductTypeService>,
}

impl ProductService {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        sellers: Arc<SellerService>,
        product_types: Arc<ProductTypeService>,
    ) -> Self {
        ProductService {
            repo,
            sellers,
            product_types,
        }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Product>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Product> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, mut product: Product) -> DomainResult<Product> {
        validate_product(&product)?;
        require_reference(self.sellers.get_by_id(product.seller_id)).await?;
        require_reference(self.product_types.get_by_id(product.product_type_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_code(&product.product_code).await?,
            None,
            NaturalKey::ProductCode,
        )?;

        product.id = self.repo.save(&product).await?;
        info!(id = product.id, code = %product.product_code, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: i64, patch: ProductPatch) -> DomainResult<Product> {
        let current = self.get_by_id(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut product = current.clone();
        patch.apply_to(&mut product);
        validate_product(&product)?;

        if product.seller_id != current.seller_id {
            require_reference(self.sellers.get_by_id(product.seller_id)).await?;
        }
        if product.product_type_id != current.product_type_id {
            require_reference(self.product_types.get_by_id(product.product_type_id)).await?;
        }
        if product.product_code != current.product_code {
            ensure_unclaimed(
                self.repo.find_by_code(&product.product_code).await?,
                Some(id),
                NaturalKey::ProductCode,
            )?;
        }

        self.repo.update(&product).await?;
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(id, "Product deleted");
        Ok(())
    }

    pub async fn report_records(&self, id: Option<i64>) -> DomainResult<Vec<ProductRecordsReport>> {
        Ok(self.repo.report_records(id).await?)
    }
}

// =============================================================================
// Product Records
// =============================================================================

pub struct ProductRecordService {
    repo: Arc<dyn ProductRecordRepository>,
    products: Arc<ProductService>,
}

impl ProductRecordService {
    pub fn new(repo: Arc<dyn ProductRecordRepository>, products: Arc<ProductService>) -> Self {
        ProductRecordService { repo, products }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<ProductRecord>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<ProductRecord> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, mut record: ProductRecord) -> DomainResult<ProductRecord> {
        validate_product_record(&record)?;
        require_reference(self.products.get_by_id(record.product_id)).await?;

        record.id = self.repo.save(&record).await?;
        info!(id = record.id, product_id = record.product_id, "Product record created");
        Ok(record)
    }

    pub async fn update(&self, id: i64, mut record: ProductRecord) -> DomainResult<ProductRecord> {
        self.get_by_id(id).await?;
        record.id = id;
        validate_product_record(&record)?;
        require_reference(self.products.get_by_id(record.product_id)).await?;
        self.repo.update(&record).await?;
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }
}

// =============================================================================
// Product Batches
// =============================================================================

pub struct ProductBatchService {
    repo: Arc<dyn ProductBatchRepository>,
    products: Arc<ProductService>,
    sections: Arc<SectionService>,
}

impl ProductBatchService {
    pub fn new(
        repo: Arc<dyn ProductBatchRepository>,
        products: Arc<ProductService>,
        sections: Arc<SectionService>,
    ) -> Self {
        ProductBatchService {
            repo,
            products,
            sections,
        }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<ProductBatch>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<ProductBatch> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, batch: ProductBatch) -> DomainResult<ProductBatch> {
        self.store(batch, None).await
    }

    pub async fn update(&self, id: i64, batch: ProductBatch) -> DomainResult<ProductBatch> {
        self.get_by_id(id).await?;
        self.store(batch, Some(id)).await
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }

    async fn store(&self, mut batch: ProductBatch, id: Option<i64>) -> DomainResult<ProductBatch> {
        validate_product_batch(&batch)?;
        require_reference(self.products.get_by_id(batch.product_id)).await?;
        require_reference(self.sections.get_by_id(batch.section_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_batch_number(batch.batch_number).await?,
            id,
            NaturalKey::BatchNumber,
        )?;

        match id {
            Some(id) => {
                batch.id = id;
                self.repo.update(&batch).await?;
            }
            None => {
                batch.id = self.repo.save(&batch).await?;
                info!(id = batch.id, number = batch.batch_number, "Product batch created");
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::{catalog_fixture, memory_services, product, record};
    use wareflow_core::{DomainError, EntityKind, NaturalKey, ProductPatch};

    #[tokio::test]
    async fn test_product_checks_seller_before_product_type() {
        let services = memory_services();
        let err = services.products.create(product("P1", 40, 41)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(EntityKind::Seller)));
    }

    #[tokio::test]
    async fn test_product_code_reuse_conflicts() {
        let services = memory_services();
        let fx = catalog_fixture(&services).await;

        let err = services
            .products
            .create(product("P-1", fx.seller_id, fx.product_type_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(NaturalKey::ProductCode)));
    }

    #[tokio::test]
    async fn test_product_patch_to_missing_type_is_invalid_reference() {
        let services = memory_services();
        let fx = catalog_fixture(&services).await;

        let patch = ProductPatch {
            product_type_id: Some(404),
            ..Default::default()
        };
        let err = services.products.update(fx.product_id, patch).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(EntityKind::ProductType)));
    }

    #[tokio::test]
    async fn test_record_replace_and_report() {
        let services = memory_services();
        let fx = catalog_fixture(&services).await;

        let created = services.product_records.create(record(fx.product_id)).await.unwrap();
        let mut changed = created.clone();
        changed.sale_price = 99.5;
        let stored = services
            .product_records
            .update(created.id, changed.clone())
            .await
            .unwrap();
        assert_eq!(stored, changed);

        let report = services.products.report_records(Some(fx.product_id)).await.unwrap();
        assert_eq!(report[0].records_count, 1);
    }

    #[tokio::test]
    async fn test_product_with_records_cannot_be_deleted() {
        let services = memory_services();
        let fx = catalog_fixture(&services).await;
        services.product_records.create(record(fx.product_id)).await.unwrap();

        let err = services.products.delete(fx.product_id).await.unwrap_err();
        assert!(matches!(err, DomainError::ReferencedByChild(EntityKind::Product)));
    }
}
